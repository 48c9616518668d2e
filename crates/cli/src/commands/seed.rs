//! Catalog seeding.
//!
//! Loads products from a YAML catalog file, or the built-in default catalog,
//! into the storefront database. Existing products with the same ID are
//! updated in place; `--replace` also deletes products that are not in the
//! seed.
//!
//! ```yaml
//! products:
//!   - id: 6f1c3d2a-0b5e-4c1a-9a31-000000000003
//!     name: Tea
//!     price: "2.00"
//!     category: Tea
//! ```

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use coffeeshop_core::Product;
use coffeeshop_storefront::config::database_url_from_env;
use coffeeshop_storefront::db::seed::{CatalogFile, default_catalog};
use coffeeshop_storefront::db::{PgStore, Store, create_pool};

use super::{CommandError, DATABASE_URL_VAR};

/// Seed the catalog from `file`, or the default catalog if `None`.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be read or parsed, the catalog is
/// invalid, or database operations fail.
pub async fn catalog(file: Option<&Path>, replace: bool) -> Result<(), CommandError> {
    // Read and validate before connecting to the database
    let products = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog from file");
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CommandError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
            parse_catalog(&content)?
        }
        None => {
            info!("Using default catalog");
            default_catalog()
        }
    };
    validate(&products)?;
    info!(products = products.len(), "Catalog validated");

    let database_url = database_url_from_env(DATABASE_URL_VAR)?;
    let store = PgStore::new(create_pool(&database_url).await?);
    info!("Connected to database");

    let written = if replace {
        warn!("Replacing catalog; products not in the seed will be deleted");
        store.replace_products(&products).await?
    } else {
        store.upsert_products(&products).await?
    };

    info!("Seeding complete!");
    info!("  Products written: {written}");
    Ok(())
}

/// Parse a YAML catalog file.
fn parse_catalog(content: &str) -> Result<Vec<Product>, CommandError> {
    let file: CatalogFile = serde_yaml::from_str(content)?;
    Ok(file.into_products())
}

/// Reject catalogs that are empty or list an ID or name twice.
fn validate(products: &[Product]) -> Result<(), CommandError> {
    if products.is_empty() {
        return Err(CommandError::InvalidCatalog(
            "catalog has no products".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for product in products {
        if product.name.trim().is_empty() {
            return Err(CommandError::InvalidCatalog(format!(
                "product {} has no name",
                product.id
            )));
        }
        if !ids.insert(product.id) {
            return Err(CommandError::InvalidCatalog(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        if !names.insert(product.name.as_str()) {
            return Err(CommandError::InvalidCatalog(format!(
                "duplicate product name {:?}",
                product.name
            )));
        }
    }
    Ok(())
}
