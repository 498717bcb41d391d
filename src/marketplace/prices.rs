use std::collections::HashMap;

use super::MarketplaceClient;
use super::types::{Goods, GoodsResponse};
use crate::utils::error::Result;

const GOODS_FILTER_PATH: &str = "/api/v2/list/goods/filter";

/// Storefront prices of one vendor code, taken from its first size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WbPrices {
    pub price: f64,
    pub discounted_price: f64,
    pub club_discounted_price: f64,
}

/// Price list indexed by vendor code.
#[derive(Debug, Clone, Default)]
pub struct PriceList {
    by_vendor_code: HashMap<String, WbPrices>,
}

impl PriceList {
    pub fn from_goods(goods: Vec<Goods>) -> Self {
        let mut by_vendor_code = HashMap::new();
        for item in goods {
            let prices = item
                .sizes
                .first()
                .map(|size| WbPrices {
                    price: size.price,
                    discounted_price: size.discounted_price,
                    club_discounted_price: size.club_discounted_price,
                })
                .unwrap_or_default();
            // First listing of a vendor code wins.
            by_vendor_code.entry(item.vendor_code).or_insert(prices);
        }
        Self { by_vendor_code }
    }

    /// Prices for `vendor_code`, zeros when it is not listed.
    pub fn get(&self, vendor_code: &str) -> WbPrices {
        self.by_vendor_code
            .get(vendor_code)
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_vendor_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vendor_code.is_empty()
    }
}

impl MarketplaceClient {
    pub async fn price_list(&self, limit: u32, offset: u32) -> Result<PriceList> {
        let url = Self::endpoint(&self.config.prices_api_url, GOODS_FILTER_PATH);
        let response: GoodsResponse = self
            .get_json(
                &url,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
                "goods price list",
            )
            .await?;

        Ok(PriceList::from_goods(response.data.list_goods))
    }
}
