//! Database operations for the bookstore `PostgreSQL`.
//!
//! ## Tables
//!
//! - `category` - Book categories
//! - `book` - Catalog, the authoritative price and category source
//! - `customer` - One row per placed order's customer
//! - `customer_order` - Orders
//! - `order_line_item` - One row per cart line, created with its order
//!
//! The order service talks to these tables through the collaborator traits
//! in [`stores`]; the repositories here are their `PostgreSQL`
//! implementations.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bookstore-cli -- migrate
//! ```

pub mod books;
pub mod categories;
pub mod customers;
pub mod line_items;
pub mod orders;
pub mod stores;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

pub use books::BookRepository;
pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use line_items::LineItemRepository;
pub use orders::OrderRepository;
pub use stores::{BookLookup, CustomerStore, LineItemStore, OrderStore, TransactionManager};

/// Transaction handle shared by the `PostgreSQL` stores during placement.
pub type PgTx = Transaction<'static, Postgres>;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate category name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique and foreign-key violations to [`RepositoryError::Conflict`].
    pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && (db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation())
        {
            return Self::Conflict(format!("{what}: {}", db_err.message()));
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Opens and finishes `PostgreSQL` transactions for the order service.
#[derive(Debug, Clone)]
pub struct PgTransactions {
    pool: PgPool,
}

impl PgTransactions {
    /// Create a transaction manager over a pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactions {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, RepositoryError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), RepositoryError> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: PgTx) -> Result<(), RepositoryError> {
        Ok(tx.rollback().await?)
    }
}
