//! Wire types for the Wildberries seller APIs.
//!
//! Only the fields the pipelines read are modelled; everything else in the
//! responses is ignored by serde.

use serde::{Deserialize, Serialize};

/// One catalog card from `content/v2/get/cards/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    #[serde(rename = "nmID", default)]
    pub nm_id: i64,
    /// Empty when the card has none; such cards classify as malformed.
    #[serde(rename = "vendorCode", default)]
    pub vendor_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub sizes: Vec<CardSize>,
}

impl Card {
    /// All SKUs across every size of the card, in response order.
    pub fn skus(&self) -> Vec<&str> {
        self.sizes
            .iter()
            .flat_map(|size| size.skus.iter().map(String::as_str))
            .collect()
    }
}

/// Package dimensions in centimetres.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub length: u32,
    #[serde(rename = "isValid", default)]
    pub is_valid: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardSize {
    #[serde(default)]
    pub skus: Vec<String>,
}

/// Resumption point of the catalog listing.
///
/// The zero value (empty token, zero id) requests the first page and is also
/// what the server returns once the listing is exhausted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardsCursor {
    #[serde(rename = "updatedAt", default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(rename = "nmID", default, skip_serializing_if = "is_zero")]
    pub nm_id: i64,
}

impl CardsCursor {
    pub fn is_exhausted(&self) -> bool {
        self.updated_at.is_empty() || self.nm_id == 0
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseCursor {
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
    #[serde(rename = "nmID", default)]
    pub nm_id: i64,
}

impl ResponseCursor {
    pub fn position(&self) -> CardsCursor {
        CardsCursor {
            updated_at: self.updated_at.clone(),
            nm_id: self.nm_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardsListResponse {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub cursor: ResponseCursor,
}

#[derive(Debug, Serialize)]
pub(crate) struct CardsListRequest<'a> {
    pub settings: CardsSettings<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CardsSettings<'a> {
    pub cursor: CursorRequest<'a>,
    pub filter: CardsFilter<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CursorRequest<'a> {
    pub limit: u32,
    #[serde(flatten)]
    pub position: &'a CardsCursor,
}

#[derive(Debug, Serialize)]
pub(crate) struct CardsFilter<'a> {
    #[serde(rename = "withPhoto")]
    pub with_photo: i32,
    #[serde(rename = "objectIDs")]
    pub object_ids: &'a [i64],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TariffResponse {
    #[serde(default)]
    pub response: TariffEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TariffEnvelope {
    #[serde(default)]
    pub data: TariffData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TariffData {
    #[serde(rename = "warehouseList", default)]
    pub warehouse_list: Vec<WarehouseTariff>,
}

/// Box delivery rates come back either as numbers or as strings with a
/// decimal comma (`"40,25"`), so they are kept raw until parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseTariff {
    #[serde(rename = "warehouseName")]
    pub warehouse_name: String,
    #[serde(rename = "boxDeliveryBase", default)]
    pub box_delivery_base: serde_json::Value,
    #[serde(rename = "boxDeliveryLiter", default)]
    pub box_delivery_liter: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoodsResponse {
    #[serde(default)]
    pub data: GoodsData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoodsData {
    #[serde(rename = "listGoods", default)]
    pub list_goods: Vec<Goods>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Goods {
    #[serde(rename = "nmID")]
    pub nm_id: i64,
    #[serde(rename = "vendorCode")]
    pub vendor_code: String,
    #[serde(default)]
    pub sizes: Vec<GoodsSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoodsSize {
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "discountedPrice", default)]
    pub discounted_price: f64,
    #[serde(rename = "clubDiscountedPrice", default)]
    pub club_discounted_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionResponse {
    #[serde(default)]
    pub report: Vec<Commission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commission {
    #[serde(rename = "kgvpMarketplace", default)]
    pub kgvp_marketplace: f64,
    #[serde(rename = "subjectID")]
    pub subject_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrdersResponse {
    #[serde(default)]
    pub orders: Vec<NewOrder>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewOrder {
    pub id: i64,
    #[serde(default)]
    pub article: String,
    #[serde(rename = "salePrice", default)]
    pub sale_price: i64,
    #[serde(default)]
    pub ddate: String,
}
