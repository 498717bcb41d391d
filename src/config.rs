use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub marketplace: MarketplaceConfig,
    pub ozon: OzonConfig,
    pub telegram: TelegramConfig,
    pub catalog: CatalogConfig,
    pub economics: EconomicsConfig,
    pub weights: WeightsConfig,
    pub scraper: ScraperConfig,
    pub poller: PollerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub content_api_url: String,
    pub prices_api_url: String,
    pub common_api_url: String,
    pub orders_api_url: String,
    pub request_timeout: u64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            content_api_url: "https://content-api.wildberries.ru".to_string(),
            prices_api_url: "https://discounts-prices-api.wildberries.ru".to_string(),
            common_api_url: "https://common-api.wildberries.ru".to_string(),
            orders_api_url: "https://marketplace-api.wildberries.ru".to_string(),
            request_timeout: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OzonConfig {
    pub api_url: String,
    pub posting_status: String,
    /// Hour of the previous day (UTC) the posting window starts from.
    pub since_hour: u32,
    pub limit: u32,
}

impl Default for OzonConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-seller.ozon.ru".to_string(),
            posting_status: "awaiting_approve".to_string(),
            since_hour: 23,
            limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.telegram.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { page_limit: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    pub object_ids: Vec<i64>,
    pub vendor_code_patterns: Vec<String>,
    pub database_path: PathBuf,
    pub recreate_database: bool,
    pub tariff_date: String,
    pub tariff_warehouse: String,
    pub commission_subject_id: i64,
    pub price_list_limit: u32,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            object_ids: vec![3979],
            // Every code; ones without a product segment are rejected as malformed.
            vendor_code_patterns: vec![r"^.*$".to_string()],
            database_path: PathBuf::from("ue.db"),
            recreate_database: false,
            tariff_date: "2025-02-01".to_string(),
            tariff_warehouse: "Маркетплейс".to_string(),
            commission_subject_id: 3979,
            price_list_limit: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub object_ids: Vec<i64>,
    pub vendor_code_patterns: Vec<String>,
    pub database_path: PathBuf,
    pub recreate_database: bool,
    pub lookup_file: PathBuf,
    /// Abort the whole run when a card does not map to exactly one SKU.
    pub strict_sku: bool,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            object_ids: vec![3979, 3756],
            vendor_code_patterns: vec![
                r"^box_\d+_\d+$".to_string(),
                r"^bubblebags_9\d+_\d+$".to_string(),
                r"^bubblebags_1\d+_\d+$".to_string(),
            ],
            database_path: PathBuf::from("weights.db"),
            recreate_database: true,
            lookup_file: PathBuf::from("../cargo_avto/urls.csv"),
            strict_sku: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub supplier_base_url: String,
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub settle_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            supplier_base_url: "https://sp.cargo-avto.ru/catalog/".to_string(),
            chrome_path: None,
            headless: true,
            settle_delay_ms: 2000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("SELLER_SYNC").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("marketplace.content_api_url", &self.marketplace.content_api_url),
            ("marketplace.prices_api_url", &self.marketplace.prices_api_url),
            ("marketplace.common_api_url", &self.marketplace.common_api_url),
            ("marketplace.orders_api_url", &self.marketplace.orders_api_url),
            ("ozon.api_url", &self.ozon.api_url),
            ("telegram.api_url", &self.telegram.api_url),
            ("scraper.supplier_base_url", &self.scraper.supplier_base_url),
        ] {
            if Url::parse(value).is_err() {
                return Err(ConfigError::Message(format!("Invalid URL in {}", name)));
            }
        }

        if self.marketplace.request_timeout == 0 {
            return Err(ConfigError::Message(
                "Marketplace request_timeout must be greater than 0".into(),
            ));
        }

        if self.catalog.page_limit == 0 {
            return Err(ConfigError::Message(
                "Catalog page_limit must be greater than 0".into(),
            ));
        }

        if self.economics.vendor_code_patterns.is_empty() {
            return Err(ConfigError::Message(
                "economics.vendor_code_patterns must not be empty".into(),
            ));
        }

        if self.weights.vendor_code_patterns.is_empty() {
            return Err(ConfigError::Message(
                "weights.vendor_code_patterns must not be empty".into(),
            ));
        }

        if self.ozon.since_hour > 23 {
            return Err(ConfigError::Message(
                "ozon.since_hour must be between 0 and 23".into(),
            ));
        }

        if self.poller.interval_secs == 0 {
            return Err(ConfigError::Message(
                "Poller interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// API and bot credentials taken from their conventional environment variables.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub wb_token: Option<String>,
    pub wb_api_key: Option<String>,
    pub ozon_api_key: Option<String>,
    pub ozon_client_id: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            wb_token: non_empty_var("WB_TOKEN"),
            wb_api_key: non_empty_var("WB_API_KEY"),
            ozon_api_key: non_empty_var("OZON_API_KEY"),
            ozon_client_id: non_empty_var("OZON_CLIENT_ID"),
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
        }
    }

    pub fn require_wb_token(&self) -> Result<&str, AppError> {
        self.wb_token
            .as_deref()
            .ok_or(AppError::MissingCredential { name: "WB_TOKEN" })
    }

    pub fn require_wb_api_key(&self) -> Result<&str, AppError> {
        self.wb_api_key
            .as_deref()
            .ok_or(AppError::MissingCredential { name: "WB_API_KEY" })
    }

    /// Ozon needs both halves; either one missing disables the feed.
    pub fn ozon(&self) -> Option<(&str, &str)> {
        Some((self.ozon_client_id.as_deref()?, self.ozon_api_key.as_deref()?))
    }

    pub fn telegram(&self) -> Option<(&str, &str)> {
        Some((
            self.telegram_bot_token.as_deref()?,
            self.telegram_chat_id.as_deref()?,
        ))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
