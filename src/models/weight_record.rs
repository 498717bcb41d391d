use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `weights` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct WeightRecord {
    pub vendor_code: String,
    pub product_id: String,
    pub pcs: i64,
    pub sku: String,
    /// Grams, as read from the supplier page.
    pub weight: String,
}
