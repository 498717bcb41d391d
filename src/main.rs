use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use seller_sync::enrichment::{OfferSource, WeightSource};
use seller_sync::lookup::UrlLookup;
use seller_sync::marketplace::MarketplaceClient;
use seller_sync::notifier::{DisabledNotifier, Notifier, TelegramNotifier};
use seller_sync::orders::{OrderFeed, OzonFeed, WildberriesFeed};
use seller_sync::pipeline::{run_economics, run_weights};
use seller_sync::scheduler::OrderPoller;
use seller_sync::scraper::SupplierBrowser;
use seller_sync::storage::Store;
use seller_sync::{AppConfig, Credentials};

#[derive(Debug, Parser)]
#[command(name = "seller-sync", version, about = "Marketplace catalog, supplier and order sync")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute unit economics for the catalog and store them in the products table
    Economics,
    /// Collect package weights from the supplier and store them in the weights table
    Weights,
    /// Poll order feeds and forward new orders to Telegram until interrupted
    Orders,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("seller_sync=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    let credentials = Credentials::from_env();

    match cli.command {
        Command::Economics => economics(&config, &credentials).await,
        Command::Weights => weights(&config, &credentials).await,
        Command::Orders => orders(&config, &credentials).await,
    }
}

async fn economics(config: &AppConfig, credentials: &Credentials) -> Result<()> {
    let token = credentials.require_wb_token()?;
    let client = MarketplaceClient::new(&config.marketplace, token)?;

    let store = Store::open(
        &config.economics.database_path,
        config.economics.recreate_database,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open database {}",
            config.economics.database_path.display()
        )
    })?;

    let browser = SupplierBrowser::launch(&config.scraper)?;
    let source = OfferSource::new(browser, &config.scraper.supplier_base_url);

    run_economics(
        &client,
        &store,
        source,
        &config.economics,
        config.catalog.page_limit,
    )
    .await?;

    store.pool().close().await;
    Ok(())
}

async fn weights(config: &AppConfig, credentials: &Credentials) -> Result<()> {
    let token = credentials.require_wb_api_key()?;
    let client = MarketplaceClient::new(&config.marketplace, token)?;

    let lookup = UrlLookup::from_path(&config.weights.lookup_file).with_context(|| {
        format!(
            "Failed to load lookup file {}",
            config.weights.lookup_file.display()
        )
    })?;
    info!(entries = lookup.len(), "Loaded URL lookup");

    let store = Store::open(
        &config.weights.database_path,
        config.weights.recreate_database,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open database {}",
            config.weights.database_path.display()
        )
    })?;

    let browser = SupplierBrowser::launch(&config.scraper)?;
    let source = WeightSource::new(browser, &config.scraper.supplier_base_url, lookup)?;

    run_weights(
        &client,
        &store,
        source,
        &config.weights,
        config.catalog.page_limit,
    )
    .await?;

    store.pool().close().await;
    Ok(())
}

async fn orders(config: &AppConfig, credentials: &Credentials) -> Result<()> {
    let timeout = Duration::from_secs(config.marketplace.request_timeout);
    let mut feeds: Vec<Box<dyn OrderFeed>> = Vec::new();

    match credentials.wb_token.as_deref() {
        Some(token) => {
            let client = MarketplaceClient::new(&config.marketplace, token)?;
            feeds.push(Box::new(WildberriesFeed::new(client)));
        }
        None => warn!("WB_TOKEN is not set, Wildberries orders are not polled"),
    }

    match credentials.ozon() {
        Some((client_id, api_key)) => {
            feeds.push(Box::new(OzonFeed::new(
                &config.ozon,
                client_id,
                api_key,
                timeout,
            )?));
        }
        None => warn!("OZON_API_KEY and OZON_CLIENT_ID must both be set, Ozon orders are not polled"),
    }

    let notifier: Box<dyn Notifier> = match credentials.telegram() {
        Some((token, chat_id)) => Box::new(TelegramNotifier::new(
            &config.telegram,
            token,
            chat_id,
            timeout,
        )?),
        None => {
            warn!("TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are not set, messages will only be logged");
            Box::new(DisabledNotifier)
        }
    };

    let mut poller = OrderPoller::new(feeds, notifier, &config.poller);
    poller.run().await?;

    info!("Shutting down...");
    Ok(())
}
