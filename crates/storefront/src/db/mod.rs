//! Persistence for customers, products and baskets.
//!
//! Two [`Store`] implementations exist: [`PgStore`] over `PostgreSQL` and
//! [`MemoryStore`] for local runs and tests. Both enforce the same optimistic
//! concurrency contract on [`Store::save_basket`].
//!
//! # Database: `coffeeshop`
//!
//! ## Tables
//!
//! - `storefront.customer` - Customers, one basket each
//! - `storefront.product` - Catalog
//! - `storefront.basket` - Basket header with total, discount, status and version
//! - `storefront.basket_line` - Line items in insertion order
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p coffeeshop-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use coffeeshop_core::{Basket, Customer, CustomerId, Product, ProductId};

mod baskets;
mod customers;
mod memory;
mod postgres;
mod products;
pub mod seed;

pub use baskets::BasketRepository;
pub use customers::CustomerRepository;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use products::ProductRepository;

/// Embedded storefront migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

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

    /// Constraint violation or lost optimistic-concurrency race.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Returns `true` if the store could not be reached at all, as opposed to
    /// rejecting a query.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}

/// Storage used by the basket service.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new customer together with an empty basket.
    async fn create_customer(&self, customer: &Customer) -> Result<(), RepositoryError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    async fn load_basket(&self, customer_id: CustomerId)
    -> Result<Option<Basket>, RepositoryError>;

    /// Save a basket if the stored version still equals `basket.version()`.
    ///
    /// Returns the basket as committed, one version later.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Conflict` if another writer saved first, and
    /// `RepositoryError::NotFound` if the basket does not exist.
    async fn save_basket(&self, basket: &Basket) -> Result<Basket, RepositoryError>;

    /// Fetch the products with the given IDs. Unknown IDs are skipped.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// All products, ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Insert or update products by ID. Returns the number written.
    async fn upsert_products(&self, products: &[Product]) -> Result<u64, RepositoryError>;

    /// Replace the whole catalog. Returns the number written.
    async fn replace_products(&self, products: &[Product]) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to `RepositoryError::Conflict`.
fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
