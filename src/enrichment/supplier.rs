use async_trait::async_trait;
use regex::Regex;

use super::{Attributes, EnrichmentSource, attr};
use crate::classifier::ClassifiedCode;
use crate::lookup::UrlLookup;
use crate::scraper::{parse_catalog_weight, parse_offer, parse_table_weight_grams};
use crate::utils::error::{AppError, Result};

/// Pickup tab on a product page; stock per pickup point only renders after
/// it is opened.
pub const PICKUP_TAB_SELECTOR: &str = r##"li.tabs-item a[href="#samovivoz-tabs"]"##;

/// Codes whose weight lives on a third-party page listed in the lookup file.
pub const LOOKUP_CODE_PATTERN: &str = r"^bubblebags_1\d+_\d+$";

/// Loads a page and returns its rendered HTML. When `reveal` is given, the
/// element it selects is clicked before the HTML is read.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str, reveal: Option<&str>) -> Result<String>;
}

pub fn product_url(base_url: &str, product_id: &str) -> String {
    format!("{}{}/", base_url, product_id)
}

/// Supplier price and pickup stock for a product id.
pub struct OfferSource<L> {
    loader: L,
    base_url: String,
}

impl<L: PageLoader> OfferSource<L> {
    pub fn new(loader: L, base_url: impl Into<String>) -> Self {
        Self {
            loader,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl<L: PageLoader> EnrichmentSource for OfferSource<L> {
    fn name(&self) -> &str {
        "supplier-offer"
    }

    async fn fetch(&self, code: &ClassifiedCode) -> Result<Attributes> {
        let url = product_url(&self.base_url, &code.product_id);
        let html = self.loader.load(&url, Some(PICKUP_TAB_SELECTOR)).await?;
        let offer = parse_offer(&html)?;

        Ok(Attributes::from([
            (attr::PRICE.to_string(), offer.price),
            (
                attr::AVAILABLE_COUNT.to_string(),
                offer.available_count.to_string(),
            ),
        ]))
    }
}

/// Package weight in grams, read either from the supplier catalog page or
/// from a third-party page found through the lookup file.
pub struct WeightSource<L> {
    loader: L,
    base_url: String,
    lookup: UrlLookup,
    lookup_codes: Regex,
}

impl<L: PageLoader> WeightSource<L> {
    pub fn new(loader: L, base_url: impl Into<String>, lookup: UrlLookup) -> Result<Self> {
        Ok(Self {
            loader,
            base_url: base_url.into(),
            lookup,
            lookup_codes: Regex::new(LOOKUP_CODE_PATTERN)?,
        })
    }

    /// Lookup key for a code: everything before the last segment, so
    /// `bubblebags_19323_50` is listed as `bubblebags_19323`.
    pub fn lookup_key(vendor_code: &str) -> &str {
        vendor_code
            .rsplit_once('_')
            .map_or(vendor_code, |(key, _)| key)
    }
}

#[async_trait]
impl<L: PageLoader> EnrichmentSource for WeightSource<L> {
    fn name(&self) -> &str {
        "supplier-weight"
    }

    async fn fetch(&self, code: &ClassifiedCode) -> Result<Attributes> {
        let weight = if self.lookup_codes.is_match(&code.vendor_code) {
            let key = Self::lookup_key(&code.vendor_code);
            let url = self.lookup.get(key).ok_or_else(|| AppError::MissingLookup {
                key: key.to_string(),
            })?;
            let html = self.loader.load(url, None).await?;
            parse_table_weight_grams(&html)?
        } else {
            let url = product_url(&self.base_url, &code.product_id);
            let html = self.loader.load(&url, None).await?;
            parse_catalog_weight(&html)?
        };

        Ok(Attributes::from([(attr::WEIGHT.to_string(), weight)]))
    }
}
