pub mod classifier;
pub mod config;
pub mod enrichment;
pub mod lookup;
pub mod marketplace;
pub mod models;
pub mod notifier;
pub mod orders;
pub mod pipeline;
pub mod pricing;
pub mod scheduler;
pub mod scraper;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, Credentials};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
