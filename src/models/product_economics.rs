use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::classifier::ClassifiedCode;
use crate::marketplace::WbPrices;
use crate::marketplace::types::Card;

/// A row of the `products` table: one supplier product with its marketplace
/// prices and derived unit economics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProductEconomics {
    pub product_id: String,
    pub nm_id: i64,
    pub vendor_code: String,

    // Package dimensions, cm
    pub width: i64,
    pub height: i64,
    pub length: i64,
    pub pcs: i64,

    // Storefront prices
    pub price: f64,
    pub discounted_price: f64,
    pub club_discounted_price: f64,

    /// Pickup points with the product in stock.
    pub available_count: i64,
    /// Supplier price rounded up, times `pcs`.
    pub cost: i64,
    pub tariff: f64,
    pub commission: i64,
}

impl ProductEconomics {
    /// Starts a row from the card and its classification; supplier and
    /// derived values are filled in by the caller.
    pub fn from_card(card: &Card, code: &ClassifiedCode, prices: WbPrices) -> Self {
        Self {
            product_id: code.product_id.clone(),
            nm_id: card.nm_id,
            vendor_code: card.vendor_code.clone(),
            width: i64::from(card.dimensions.width),
            height: i64::from(card.dimensions.height),
            length: i64::from(card.dimensions.length),
            pcs: i64::from(code.pieces),
            price: prices.price,
            discounted_price: prices.discounted_price,
            club_discounted_price: prices.club_discounted_price,
            available_count: 0,
            cost: 0,
            tariff: 0.0,
            commission: 0,
        }
    }
}
