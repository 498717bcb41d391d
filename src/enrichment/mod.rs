//! Supplier-side attributes for classified catalog records.
//!
//! Results are memoized per product id for the length of a run.

pub mod supplier;

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::classifier::ClassifiedCode;
use crate::utils::error::Result;

pub use supplier::{OfferSource, PageLoader, WeightSource};

/// Named string attributes scraped for one product.
pub type Attributes = HashMap<String, String>;

/// Attribute keys produced by the supplier sources.
pub mod attr {
    pub const PRICE: &str = "price";
    pub const AVAILABLE_COUNT: &str = "available_count";
    pub const WEIGHT: &str = "weight";
}

#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, code: &ClassifiedCode) -> Result<Attributes>;
}

/// Run-scoped memo in front of an [`EnrichmentSource`].
///
/// Only successes are stored; a failed product is fetched again the next
/// time it comes up.
pub struct EnrichmentCache<S> {
    source: S,
    entries: HashMap<String, Attributes>,
    hits: usize,
    misses: usize,
}

impl<S: EnrichmentSource> EnrichmentCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub async fn get(&mut self, code: &ClassifiedCode) -> Result<Attributes> {
        if let Some(cached) = self.entries.get(&code.product_id) {
            debug!(product_id = %code.product_id, "Using cached supplier data");
            self.hits += 1;
            return Ok(cached.clone());
        }

        self.misses += 1;
        debug!(
            product_id = %code.product_id,
            source = self.source.name(),
            "Fetching supplier data"
        );
        let attributes = self.source.fetch(code).await?;
        self.entries
            .insert(code.product_id.clone(), attributes.clone());
        Ok(attributes)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
