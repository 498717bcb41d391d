use tracing::{info, warn};

use super::{RunSummary, classify_card};
use crate::classifier::{ClassifiedCode, VendorCodeClassifier};
use crate::config::EconomicsConfig;
use crate::enrichment::{Attributes, EnrichmentCache, EnrichmentSource, attr};
use crate::marketplace::types::Card;
use crate::marketplace::{BoxTariff, MarketplaceClient, PriceList, WbPrices, commission_percent};
use crate::models::ProductEconomics;
use crate::pricing;
use crate::storage::Store;
use crate::utils::error::{AppError, Result};

/// Rates shared by every row of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EconomicsRates {
    pub tariff: BoxTariff,
    pub commission_percent: i64,
}

/// Builds the stored row from a card, its storefront prices and the
/// supplier attributes.
pub fn build_row(
    card: &Card,
    code: &ClassifiedCode,
    prices: WbPrices,
    attributes: &Attributes,
    rates: EconomicsRates,
) -> Result<ProductEconomics> {
    let supplier_price = attributes
        .get(attr::PRICE)
        .ok_or_else(|| AppError::NotFound {
            resource: format!("supplier price for product {}", code.product_id),
        })?;

    let mut row = ProductEconomics::from_card(card, code, prices);
    row.cost = pricing::unit_cost(supplier_price, code.pieces)?;

    let volume = pricing::volume_liters(
        card.dimensions.width,
        card.dimensions.height,
        card.dimensions.length,
    );
    row.tariff = pricing::delivery_tariff(volume, rates.tariff);
    row.commission = pricing::commission(prices.club_discounted_price, rates.commission_percent);

    let raw_count = attributes
        .get(attr::AVAILABLE_COUNT)
        .map(String::as_str)
        .unwrap_or_default();
    row.available_count = match raw_count.trim().parse::<i64>() {
        Ok(count) => count,
        Err(e) => {
            warn!(
                vendor_code = %card.vendor_code,
                value = raw_count,
                error = %e,
                "Unparsable available count, storing 0"
            );
            0
        }
    };

    Ok(row)
}

/// Loads the run-wide rates and price list. Each lookup that fails is logged
/// and replaced by zeros so the catalog is still processed.
async fn load_rates(client: &MarketplaceClient, config: &EconomicsConfig) -> (EconomicsRates, PriceList) {
    let tariff = client
        .box_tariff(&config.tariff_date, &config.tariff_warehouse)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Box tariffs unavailable, using zero rates");
            BoxTariff::default()
        });

    let prices = client
        .price_list(config.price_list_limit, 0)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Price list unavailable, prices will be zero");
            PriceList::default()
        });

    let percent = match client.commission_report().await {
        Ok(report) => commission_percent(&report, config.commission_subject_id).unwrap_or_else(|| {
            warn!(
                subject_id = config.commission_subject_id,
                "Subject not in commission report, using 0%"
            );
            0
        }),
        Err(e) => {
            warn!(error = %e, "Commission report unavailable, using 0%");
            0
        }
    };

    info!(
        base = tariff.base,
        per_liter = tariff.per_liter,
        commission_percent = percent,
        priced = prices.len(),
        "Loaded marketplace rates"
    );

    (
        EconomicsRates {
            tariff,
            commission_percent: percent,
        },
        prices,
    )
}

/// Unit economics for every matching card, upserted into `products`.
pub async fn run_economics<S: EnrichmentSource>(
    client: &MarketplaceClient,
    store: &Store,
    source: S,
    config: &EconomicsConfig,
    page_limit: u32,
) -> Result<RunSummary> {
    store.ensure_products_schema().await?;
    let classifier = VendorCodeClassifier::new(&config.vendor_code_patterns)?;

    let (rates, prices) = load_rates(client, config).await;
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

        let attributes = match cache.get(&code).await {
            Ok(attributes) => attributes,
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, product_id = %code.product_id, error = %e, "Supplier lookup failed");
                continue;
            }
        };

        let row = match build_row(card, &code, prices.get(&card.vendor_code), &attributes, rates) {
            Ok(row) => row,
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, error = %e, "Could not compute unit economics");
                continue;
            }
        };

        match store.upsert_product_economics(&row).await {
            Ok(()) => {
                summary.saved += 1;
                info!(
                    vendor_code = %row.vendor_code,
                    cost = row.cost,
                    tariff = row.tariff,
                    commission = row.commission,
                    "Saved product"
                );
            }
            Err(e) => {
                summary.failed += 1;
                warn!(vendor_code = %card.vendor_code, error = %e, "Failed to save product");
            }
        }
    }

    summary.enriched_from_cache = cache.hits();
    summary.log("economics");
    Ok(summary)
}
