//! HTTP client for the Wildberries seller APIs.
//!
//! Every endpoint is a plain request/response call: non-2xx statuses and
//! undecodable bodies come back as typed errors and the caller decides
//! whether they are fatal. No retries are attempted.

mod cards;
mod commission;
mod orders;
mod prices;
mod tariffs;
pub mod types;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::MarketplaceConfig;
use crate::utils::error::{AppError, Result};

pub use commission::commission_percent;
pub use prices::{PriceList, WbPrices};
pub use tariffs::{BoxTariff, parse_flexible_float};

pub struct MarketplaceClient {
    client: Client,
    token: String,
    config: MarketplaceConfig,
}

impl MarketplaceClient {
    pub fn new(config: &MarketplaceConfig, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            token: token.to_string(),
            config: config.clone(),
        })
    }

    fn endpoint(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, &self.token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T> {
        let response = self
            .authorized(self.client.get(url))
            .query(query)
            .send()
            .await?;

        read_json(response, url, context).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        let response = self
            .authorized(self.client.post(url))
            .json(body)
            .send()
            .await?;

        read_json(response, url, context).await
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
    context: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("{} returned {}: {}", url, status, body);
        return Err(AppError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AppError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
