use tracing::{info, warn};

use super::{RunSummary, classify_card};
use crate::classifier::{ClassifiedCode, VendorCodeClassifier, single_sku};
use crate::config::WeightsConfig;
use crate::enrichment::{Attributes, EnrichmentCache, EnrichmentSource, attr};
use crate::marketplace::MarketplaceClient;
use crate::models::WeightRecord;
use crate::storage::Store;
use crate::utils::error::{AppError, Result};

pub fn build_weight(code: &ClassifiedCode, sku: &str, attributes: &Attributes) -> Result<WeightRecord> {
    let weight = attributes
        .get(attr::WEIGHT)
        .filter(|w| !w.trim().is_empty())
        .ok_or_else(|| AppError::NotFound {
            resource: format!("weight for product {}", code.product_id),
        })?;

    Ok(WeightRecord {
        vendor_code: code.vendor_code.clone(),
        product_id: code.product_id.clone(),
        pcs: i64::from(code.pieces),
        sku: sku.to_string(),
        weight: weight.trim().to_string(),
    })
}

/// Package weight for every matching card, upserted into `weights`.
///
/// A card without exactly one SKU is skipped, or ends the run when
/// `strict_sku` is set.
pub async fn run_weights<S: EnrichmentSource>(
    client: &MarketplaceClient,
    store: &Store,
    source: S,
    config: &WeightsConfig,
    page_limit: u32,
) -> Result<RunSummary> {
    store.ensure_weights_schema().await?;
    let classifier = VendorCodeClassifier::new(&config.vendor_code_patterns)?;

    let cards = client.fetch_all_cards(&config.object_ids, page_limit).await;

    let mut summary = RunSummary {
        fetched: cards.len(),
        ..RunSummary::default()
    };
    let mut cache = EnrichmentCache::new(source);

    for card in &cards {
        let Some(code) = classify_card(&classifier, card, &mut summary) else {
            continue;
        };

        let sku = match single_sku(card) {
            Ok(sku) => sku,
            Err(e) if config.strict_sku => return Err(e),
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, error = %e, "Skipping card");
                continue;
            }
        };

        let attributes = match cache.get(&code).await {
            Ok(attributes) => attributes,
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, product_id = %code.product_id, error = %e, "Weight lookup failed");
                continue;
            }
        };

        let row = match build_weight(&code, sku, &attributes) {
            Ok(row) => row,
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, error = %e, "No weight for card");
                continue;
            }
        };

        match store.upsert_weight(&row).await {
            Ok(()) => {
                summary.saved += 1;
                info!(vendor_code = %row.vendor_code, sku = %row.sku, weight = %row.weight, "Saved weight");
            }
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, error = %e, "Failed to save weight");
            }
        }
    }

    summary.enriched_from_cache = cache.hits();
    summary.log("weights");
    Ok(summary)
}
