//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! coffeeshop-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migration files live in `crates/storefront/migrations/` and are embedded in
//! the storefront crate.

use tracing::info;

use coffeeshop_storefront::config::database_url_from_env;
use coffeeshop_storefront::db::{MIGRATOR, create_pool};

use super::{CommandError, DATABASE_URL_VAR};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the URL is missing, the database is unreachable
/// or a migration fails.
pub async fn storefront() -> Result<(), CommandError> {
    let database_url = database_url_from_env(DATABASE_URL_VAR)?;

    info!("Connecting to storefront database...");
    let pool = create_pool(&database_url).await?;

    info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}
