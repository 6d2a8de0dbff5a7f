//! Database operations for the Storeboard SQLite store.
//!
//! ## Tables
//!
//! - `store` - Tenants; `user_id` is the owning identity
//! - `billboard` - Hero banners, referenced by categories
//! - `category` - Product categories (each points at a billboard)
//! - `size`, `color` - Product attributes
//! - `product` - Catalog items (price stored as decimal text)
//! - `product_image` - Ordered image URLs owned by a product
//! - `customer_order`, `order_item` - Orders and their line items
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/`, embedded into the
//! binaries and run via:
//! ```bash
//! cargo run -p storeboard-cli -- migrate
//! ```
//!
//! # Transactions
//!
//! Repository functions take `&mut SqliteConnection` so the resource service
//! can run the ownership check, reference checks and the write on one
//! transaction.

pub mod billboards;
pub mod categories;
pub mod colors;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., a row is still referenced).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a sqlx error, turning foreign-key violations into conflicts.
    pub(crate) fn from_write(e: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return Self::Conflict(format!("{what} is still referenced by other records"));
        }
        Self::Database(e)
    }
}

/// Whether `table` has a row with this id that belongs to the store.
///
/// Used to check that foreign ids in a payload stay inside one store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub(crate) async fn exists_in_store(
    conn: &mut SqliteConnection,
    table: &'static str,
    id: uuid::Uuid,
    store_id: storeboard_core::StoreId,
) -> Result<bool, RepositoryError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ? AND store_id = ?)");
    let (exists,): (bool,) = sqlx::query_as(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Whether a connection URL points at a private in-memory database.
#[must_use]
pub fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create a SQLite connection pool with sensible defaults.
///
/// File databases are created if missing and use WAL journaling.
/// In-memory databases live only as long as their connection, so the pool is
/// pinned to a single connection that never expires.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(10));

    if is_in_memory(url) {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// database has diverged from the embedded history.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
