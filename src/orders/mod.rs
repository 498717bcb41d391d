//! New-order feeds polled by the order poller.

pub mod ozon;
pub mod wildberries;

use async_trait::async_trait;

use crate::utils::error::Result;

pub use ozon::OzonFeed;
pub use wildberries::WildberriesFeed;

/// A marketplace feed of orders waiting for the seller.
#[async_trait]
pub trait OrderFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches the feed once and renders it as ready-to-send messages. No
    /// new orders means no messages.
    async fn poll(&self) -> Result<Vec<String>>;
}
