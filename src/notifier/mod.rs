pub mod telegram;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::error::Result;

pub use telegram::TelegramNotifier;

/// Raw outcome of one delivery attempt. Delivery is fire-and-forget, so this
/// is informational only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResult {
    pub success: bool,
    pub status: u16,
    pub body: String,
}

/// Delivers a formatted text message to a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Sends `message` once; no retries.
    async fn notify(&self, message: &str) -> Result<NotificationResult>;
}

/// Stands in when bot credentials are not configured: messages are only
/// logged.
#[derive(Debug, Default, Clone)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn notify(&self, message: &str) -> Result<NotificationResult> {
        info!("Bot credentials not configured, message not sent:\n{}", message);
        Ok(NotificationResult {
            success: false,
            status: 0,
            body: String::new(),
        })
    }
}
