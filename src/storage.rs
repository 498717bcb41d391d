//! SQLite sink for pipeline results.
//!
//! Each entry point owns one database file holding one table. Rows are keyed
//! by a natural identifier and written one statement at a time, so a failed
//! row never takes its neighbours down with it.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::models::{ProductEconomics, WeightRecord};
use crate::utils::error::Result;

const PRODUCTS_SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id TEXT NOT NULL UNIQUE,
        nm_id INTEGER NOT NULL,
        vendor_code TEXT NOT NULL,
        width INTEGER NOT NULL,
        height INTEGER NOT NULL,
        length INTEGER NOT NULL,
        pcs INTEGER NOT NULL,
        price REAL NOT NULL,
        discounted_price REAL NOT NULL,
        club_discounted_price REAL NOT NULL,
        available_count INTEGER NOT NULL,
        cost INTEGER NOT NULL,
        tariff REAL NOT NULL,
        commission INTEGER NOT NULL
    )";

const WEIGHTS_SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS weights (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vendor_code TEXT NOT NULL UNIQUE,
        product_id TEXT NOT NULL,
        pcs INTEGER NOT NULL,
        sku TEXT NOT NULL,
        weight TEXT NOT NULL
    )";

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the database at `path`. With `recreate`
    /// the file is deleted first so the run starts from an empty table.
    pub async fn open(path: impl AsRef<Path>, recreate: bool) -> Result<Self> {
        let path = path.as_ref();

        if recreate {
            match std::fs::remove_file(path) {
                Ok(()) => info!(path = %path.display(), "Removed existing database"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "Database opened");
        Ok(Self { pool })
    }

    /// Private in-memory database; lives as long as the store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_products_schema(&self) -> Result<()> {
        sqlx::query(PRODUCTS_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn ensure_weights_schema(&self) -> Result<()> {
        sqlx::query(WEIGHTS_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Inserts the row or overwrites every column of the row with the same
    /// `product_id`.
    pub async fn upsert_product_economics(&self, row: &ProductEconomics) -> Result<()> {
        sqlx::query(
            "INSERT INTO products \
                 (product_id, nm_id, vendor_code, width, height, length, pcs, \
                  price, discounted_price, club_discounted_price, \
                  available_count, cost, tariff, commission) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (product_id) DO UPDATE SET \
                 nm_id                 = excluded.nm_id, \
                 vendor_code           = excluded.vendor_code, \
                 width                 = excluded.width, \
                 height                = excluded.height, \
                 length                = excluded.length, \
                 pcs                   = excluded.pcs, \
                 price                 = excluded.price, \
                 discounted_price      = excluded.discounted_price, \
                 club_discounted_price = excluded.club_discounted_price, \
                 available_count       = excluded.available_count, \
                 cost                  = excluded.cost, \
                 tariff                = excluded.tariff, \
                 commission            = excluded.commission",
        )
        .bind(&row.product_id)
        .bind(row.nm_id)
        .bind(&row.vendor_code)
        .bind(row.width)
        .bind(row.height)
        .bind(row.length)
        .bind(row.pcs)
        .bind(row.price)
        .bind(row.discounted_price)
        .bind(row.club_discounted_price)
        .bind(row.available_count)
        .bind(row.cost)
        .bind(row.tariff)
        .bind(row.commission)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the row or overwrites the row with the same `vendor_code`.
    pub async fn upsert_weight(&self, row: &WeightRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO weights (vendor_code, product_id, pcs, sku, weight) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (vendor_code) DO UPDATE SET \
                 product_id = excluded.product_id, \
                 pcs        = excluded.pcs, \
                 sku        = excluded.sku, \
                 weight     = excluded.weight",
        )
        .bind(&row.vendor_code)
        .bind(&row.product_id)
        .bind(row.pcs)
        .bind(&row.sku)
        .bind(&row.weight)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Option<ProductEconomics>> {
        let row = sqlx::query_as::<_, ProductEconomics>(
            "SELECT product_id, nm_id, vendor_code, width, height, length, pcs, \
                    price, discounted_price, club_discounted_price, \
                    available_count, cost, tariff, commission \
             FROM products WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_weight(&self, vendor_code: &str) -> Result<Option<WeightRecord>> {
        let row = sqlx::query_as::<_, WeightRecord>(
            "SELECT vendor_code, product_id, pcs, sku, weight \
             FROM weights WHERE vendor_code = ?",
        )
        .bind(vendor_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_products(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_weights(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM weights")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
