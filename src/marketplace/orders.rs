use super::MarketplaceClient;
use super::types::{NewOrder, NewOrdersResponse};
use crate::utils::error::Result;

const NEW_ORDERS_PATH: &str = "/api/v3/orders/new";

impl MarketplaceClient {
    /// Assembly tasks that have not been picked up yet.
    pub async fn new_orders(&self) -> Result<Vec<NewOrder>> {
        let url = Self::endpoint(&self.config.orders_api_url, NEW_ORDERS_PATH);
        let response: NewOrdersResponse = self.get_json(&url, &[], "new orders").await?;
        Ok(response.orders)
    }
}
