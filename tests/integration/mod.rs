// Integration tests for seller-sync
// These tests drive the pipelines and the poller against local mock servers

pub mod pipeline_tests;
pub mod poller_tests;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use wiremock::{Request, Respond, ResponseTemplate};

use seller_sync::config::MarketplaceConfig;
use seller_sync::enrichment::PageLoader;
use seller_sync::marketplace::MarketplaceClient;
use seller_sync::notifier::{NotificationResult, Notifier};
use seller_sync::{AppError, Result};

/// Marketplace config with every API pointed at one mock server.
pub fn test_marketplace_config(uri: &str) -> MarketplaceConfig {
    MarketplaceConfig {
        content_api_url: uri.to_string(),
        prices_api_url: uri.to_string(),
        common_api_url: uri.to_string(),
        orders_api_url: uri.to_string(),
        request_timeout: 5,
    }
}

pub fn test_client(uri: &str) -> MarketplaceClient {
    MarketplaceClient::new(&test_marketplace_config(uri), "test-token")
        .expect("failed to build test MarketplaceClient")
}

/// A catalog card as the listing endpoint returns it.
pub fn card_json(nm_id: i64, vendor_code: &str, dims: (u32, u32, u32), skus: &[&str]) -> Value {
    json!({
        "nmID": nm_id,
        "vendorCode": vendor_code,
        "title": format!("Card {}", nm_id),
        "updatedAt": format!("2026-10-{:02}T10:00:00Z", (nm_id % 28) + 1),
        "dimensions": {"width": dims.0, "height": dims.1, "length": dims.2, "isValid": true},
        "sizes": [{"skus": skus}]
    })
}

/// One listing page whose trailing cursor points at `next`.
pub fn cards_page(cards: Vec<Value>, next: (&str, i64)) -> Value {
    json!({
        "cards": cards,
        "cursor": {"updatedAt": next.0, "nmID": next.1, "total": 100}
    })
}

/// Serves canned listing pages in order and records the cursor of every
/// request it sees. Requests past the last page get an empty page.
#[derive(Clone)]
pub struct CursorPager {
    pages: Arc<Vec<ResponseTemplate>>,
    served: Arc<AtomicUsize>,
    cursors: Arc<Mutex<Vec<Value>>>,
}

impl CursorPager {
    pub fn new(pages: Vec<ResponseTemplate>) -> Self {
        Self {
            pages: Arc::new(pages),
            served: Arc::new(AtomicUsize::new(0)),
            cursors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn cursors(&self) -> Vec<Value> {
        self.cursors.lock().unwrap().clone()
    }
}

impl Respond for CursorPager {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        self.cursors
            .lock()
            .unwrap()
            .push(body["settings"]["cursor"].clone());

        let index = self.served.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(index)
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(200).set_body_json(cards_page(vec![], ("", 0))))
    }
}

/// Page loader serving fixture HTML per URL and counting loads.
#[derive(Clone, Default)]
pub struct FixtureLoader {
    pages: Arc<HashMap<String, String>>,
    loads: Arc<AtomicUsize>,
}

impl FixtureLoader {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageLoader for FixtureLoader {
    async fn load(&self, url: &str, _reveal: Option<&str>) -> Result<String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Scraping(format!("no fixture for {}", url)))
    }
}

pub fn offer_page(price: &str, available: usize) -> String {
    let stock = r#"<span class="avail-item-status avail"></span>"#.repeat(available);
    format!(
        r#"<html><body>
            <ul><li data-min="1"><span class="price-val">{} р</span></li></ul>
            <div id="samovivoz-tabs">{}</div>
        </body></html>"#,
        price, stock
    )
}

pub fn catalog_weight_page(grams: &str) -> String {
    format!(
        r#"<ul><li class="characteristics-list__item"><span>Вес, г</span><span class="valls">{}</span></li></ul>"#,
        grams
    )
}

/// Notifier that keeps every message it was asked to send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, message: &str) -> Result<NotificationResult> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(NotificationResult {
            success: true,
            status: 200,
            body: String::new(),
        })
    }
}
