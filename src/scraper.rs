use ::scraper::{ElementRef, Html, Selector};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::enrichment::PageLoader;
use crate::utils::error::{AppError, Result};

const PRICE_SELECTOR: &str = r#"li[data-min="1"] .price-val"#;
const AVAILABLE_SELECTOR: &str = ".avail-item-status.avail";
const CHARACTERISTIC_SELECTOR: &str = ".characteristics-list__item";
const CHARACTERISTIC_VALUE_SELECTOR: &str = ".valls";
const CATALOG_WEIGHT_LABEL: &str = "Вес, г";
const TABLE_WEIGHT_LABEL: &str = "Вес, кг";

/// Price and pickup availability from a supplier product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierOffer {
    pub price: String,
    pub available_count: usize,
}

/// One headless Chrome session with a single tab that every page load reuses.
///
/// Navigation state lives in the tab, so the browser must not be driven from
/// two places at once.
pub struct SupplierBrowser {
    // Keeps the Chrome process alive for as long as the tab is in use.
    _browser: Browser,
    tab: Arc<Tab>,
    settle_delay: Duration,
}

impl SupplierBrowser {
    pub fn launch(config: &ScraperConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Scraping(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Scraping(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Scraping(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| AppError::Scraping(format!("Failed to set user agent: {}", e)))?;

        tracing::info!(headless = config.headless, "Supplier browser started");

        Ok(Self {
            _browser: browser,
            tab,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        })
    }

    fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|_| AppError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element
            .click()
            .map_err(|e| AppError::Scraping(format!("Click on '{}' failed: {}", selector, e)))?;
        Ok(())
    }
}

#[async_trait]
impl PageLoader for SupplierBrowser {
    async fn load(&self, url: &str, reveal: Option<&str>) -> Result<String> {
        self.tab
            .navigate_to(url)
            .map_err(|e| AppError::Scraping(format!("Navigation to {} failed: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| AppError::Scraping(format!("Page load of {} failed: {}", url, e)))?;

        // Prices and stock are filled in by scripts after the load event.
        tokio::time::sleep(self.settle_delay).await;

        if let Some(selector) = reveal {
            self.click(selector)?;
            tokio::time::sleep(self.settle_delay).await;
        }

        self.tab
            .get_content()
            .map_err(|e| AppError::Scraping(format!("Failed to get page content: {}", e)))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::Scraping(format!("Invalid CSS selector '{}': {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips currency marks and spacing from a displayed price: `"1 234,50 р."` → `"1234.50"`.
pub fn normalize_price(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect::<String>()
        .replace(',', ".")
        .trim_matches('.')
        .to_string()
}

/// Reads the single-piece price and counts the pickup points with stock.
pub fn parse_offer(html: &str) -> Result<SupplierOffer> {
    let document = Html::parse_document(html);

    let price_selector = selector(PRICE_SELECTOR)?;
    let price_text = document
        .select(&price_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| AppError::ElementNotFound {
            selector: PRICE_SELECTOR.to_string(),
        })?;

    let available_selector = selector(AVAILABLE_SELECTOR)?;
    let available_count = document.select(&available_selector).count();

    Ok(SupplierOffer {
        price: normalize_price(&price_text),
        available_count,
    })
}

/// Weight in grams from the characteristics list of a catalog page.
pub fn parse_catalog_weight(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let item_selector = selector(CHARACTERISTIC_SELECTOR)?;
    let value_selector = selector(CHARACTERISTIC_VALUE_SELECTOR)?;

    document
        .select(&item_selector)
        .find(|item| element_text(*item).contains(CATALOG_WEIGHT_LABEL))
        .and_then(|item| item.select(&value_selector).next())
        .map(element_text)
        .filter(|weight| !weight.is_empty())
        .ok_or_else(|| AppError::ElementNotFound {
            selector: format!("{} '{}'", CHARACTERISTIC_SELECTOR, CATALOG_WEIGHT_LABEL),
        })
}

/// Weight from a characteristics table row given in kilograms, converted to
/// whole grams.
pub fn parse_table_weight_grams(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let raw = document
        .select(&row_selector)
        .find_map(|row| {
            let cells: Vec<String> = row.select(&cell_selector).map(element_text).collect();
            match cells.as_slice() {
                [label, value, ..] if label == TABLE_WEIGHT_LABEL => Some(value.clone()),
                _ => None,
            }
        })
        .ok_or_else(|| AppError::ElementNotFound {
            selector: format!("tr '{}'", TABLE_WEIGHT_LABEL),
        })?;

    let kilograms: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|e| AppError::parse(format!("invalid weight '{}': {}", raw, e)))?;

    Ok(format!("{:.0}", kilograms * 1000.0))
}
