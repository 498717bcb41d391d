//! Catalog pipelines: fetch → classify → enrich → derive → upsert.
//!
//! Both pipelines run strictly one record at a time. Only setup failures
//! (schema, patterns) end a run early; anything wrong with a single record is
//! logged with its vendor code and counted in the [`RunSummary`].

pub mod economics;
pub mod weights;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::{Classification, ClassifiedCode, VendorCodeClassifier};
use crate::marketplace::types::Card;

pub use economics::run_economics;
pub use weights::run_weights;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Cards returned by the catalog listing.
    pub fetched: usize,
    pub matched: usize,
    /// Cards no rule matched, plus malformed codes.
    pub skipped: usize,
    /// Matched cards served from the enrichment memo.
    pub enriched_from_cache: usize,
    pub saved: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn log(&self, pipeline: &str) {
        info!(
            pipeline,
            fetched = self.fetched,
            matched = self.matched,
            skipped = self.skipped,
            enriched_from_cache = self.enriched_from_cache,
            saved = self.saved,
            failed = self.failed,
            "Run finished"
        );
    }
}

/// Classifies a card, counting and logging the ones that are not processed.
fn classify_card(
    classifier: &VendorCodeClassifier,
    card: &Card,
    summary: &mut RunSummary,
) -> Option<ClassifiedCode> {
    match classifier.classify(&card.vendor_code) {
        Classification::Matched(code) => {
            summary.matched += 1;
            Some(code)
        }
        Classification::NotMatched => {
            summary.skipped += 1;
            debug!(vendor_code = %card.vendor_code, nm_id = card.nm_id, "No rule matches vendor code, skipping");
            None
        }
        Classification::Malformed => {
            summary.skipped += 1;
            warn!(vendor_code = %card.vendor_code, nm_id = card.nm_id, "Malformed vendor code, skipping");
            None
        }
    }
}
