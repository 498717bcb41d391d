use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::{NotificationResult, Notifier};
use crate::config::TelegramConfig;
use crate::utils::error::Result;

/// Posts messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> Result<NotificationResult> {
        let response = self
            .client
            .post(self.send_message_url())
            .form(&[("chat_id", self.chat_id.as_str()), ("text", message)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        // The body is logged whatever the status; a rejected message is not an error.
        info!(status = status.as_u16(), "Telegram response: {}", body);

        Ok(NotificationResult {
            success: status.is_success(),
            status: status.as_u16(),
            body,
        })
    }
}
