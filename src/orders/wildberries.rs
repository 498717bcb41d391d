use async_trait::async_trait;
use std::fmt::Write;

use super::OrderFeed;
use crate::marketplace::MarketplaceClient;
use crate::marketplace::types::NewOrder;
use crate::utils::error::Result;

const HEADER: &str = "📦 Новые заказы на Wildberries:\n";

pub struct WildberriesFeed {
    client: MarketplaceClient,
}

impl WildberriesFeed {
    pub fn new(client: MarketplaceClient) -> Self {
        Self { client }
    }
}

/// All new orders in a single message, one line each.
pub fn format_orders(orders: &[NewOrder]) -> String {
    let mut message = String::from(HEADER);
    for order in orders {
        let _ = writeln!(
            message,
            "🔹 ID: {}, Артикул: {}, Цена: {}₽, Дата доставки: {}",
            order.id, order.article, order.sale_price, order.ddate
        );
    }
    message
}

#[async_trait]
impl OrderFeed for WildberriesFeed {
    fn name(&self) -> &str {
        "wildberries"
    }

    async fn poll(&self) -> Result<Vec<String>> {
        let orders = self.client.new_orders().await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![format_orders(&orders)])
    }
}
