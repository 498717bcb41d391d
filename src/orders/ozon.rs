use std::fmt::Write;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::OrderFeed;
use crate::config::OzonConfig;
use crate::marketplace::read_json;
use crate::utils::error::{AppError, Result};

const POSTING_LIST_PATH: &str = "/v3/posting/fbs/list";
const HEADER: &str = "📦 Новые заказы на OZON:\n";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Serialize)]
struct PostingListRequest<'a> {
    dir: &'a str,
    filter: PostingFilter<'a>,
    limit: u32,
    offset: u32,
    with: PostingWith,
}

#[derive(Debug, Serialize)]
struct PostingFilter<'a> {
    since: String,
    to: String,
    status: &'a str,
}

#[derive(Debug, Serialize)]
struct PostingWith {
    analytics_data: bool,
    financial_data: bool,
}

#[derive(Debug, Deserialize)]
pub struct PostingListResponse {
    #[serde(default)]
    pub result: PostingListResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostingListResult {
    #[serde(default)]
    pub postings: Vec<Posting>,
    #[serde(default)]
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Posting {
    pub posting_number: String,
    #[serde(default)]
    pub order_id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub products: Vec<PostingProduct>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PostingProduct {
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: i64,
    #[serde(default)]
    pub quantity: i64,
}

/// FBS postings awaiting approval on Ozon.
pub struct OzonFeed {
    client: Client,
    config: OzonConfig,
    client_id: String,
    api_key: String,
}

impl OzonFeed {
    pub fn new(config: &OzonConfig, client_id: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            config: config.clone(),
            client_id: client_id.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

/// Posting search window: from `since_hour`:00 UTC of the previous day up
/// to `now`.
pub fn posting_window(now: DateTime<Utc>, since_hour: u32) -> Result<(String, String)> {
    let since = now
        .date_naive()
        .checked_sub_days(Days::new(1))
        .and_then(|day| day.and_hms_opt(since_hour, 0, 0))
        .ok_or_else(|| AppError::Validation(format!("invalid posting window hour {}", since_hour)))?
        .and_utc();

    Ok((
        since.format(TIMESTAMP_FORMAT).to_string(),
        now.format(TIMESTAMP_FORMAT).to_string(),
    ))
}

/// One message per posting, one line per product in it.
pub fn format_posting(posting: &Posting) -> String {
    let mut message = String::from(HEADER);
    for product in &posting.products {
        let _ = writeln!(
            message,
            "  - Товар: {} (SKU: {}, Количество: {}, Цена: {} {}, OfferID: {})",
            product.name,
            product.sku,
            product.quantity,
            product.price,
            product.currency_code,
            product.offer_id
        );
    }
    message
}

#[async_trait]
impl OrderFeed for OzonFeed {
    fn name(&self) -> &str {
        "ozon"
    }

    async fn poll(&self) -> Result<Vec<String>> {
        let (since, to) = posting_window(Utc::now(), self.config.since_hour)?;
        let request = PostingListRequest {
            dir: "ASC",
            filter: PostingFilter {
                since,
                to,
                status: &self.config.posting_status,
            },
            limit: self.config.limit,
            offset: 0,
            with: PostingWith {
                analytics_data: true,
                financial_data: true,
            },
        };

        let url = format!(
            "{}{}",
            self.config.api_url.trim_end_matches('/'),
            POSTING_LIST_PATH
        );
        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let body: PostingListResponse = read_json(response, &url, "ozon postings").await?;
        if body.result.has_next {
            tracing::warn!(
                limit = self.config.limit,
                "More Ozon postings than fit in one page, only the first page is reported"
            );
        }

        Ok(body.result.postings.iter().map(format_posting).collect())
    }
}
