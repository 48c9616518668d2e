//! Catalog access with a product cache.
//!
//! Products are cached by ID using `moka`. Pricing a basket resolves every
//! referenced product through [`CatalogService::snapshot`], which serves hits
//! from the cache and fetches all misses in one store call.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use coffeeshop_core::{CatalogSnapshot, Product, ProductId};

use crate::db::{RepositoryError, Store};

/// Upper bound on cached products.
const CACHE_CAPACITY: u64 = 10_000;

/// Product lookups for the basket service.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    cache: Option<Cache<ProductId, Product>>,
}

impl CatalogService {
    /// Create a catalog service. A `ttl` of `None` disables caching.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, ttl: Option<Duration>) -> Self {
        let cache = ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });
        Self { store, cache }
    }

    /// Resolve `ids` into a snapshot. IDs that do not exist are left out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn snapshot(&self, ids: &[ProductId]) -> Result<CatalogSnapshot, RepositoryError> {
        let mut snapshot = CatalogSnapshot::new();
        let mut misses = Vec::new();

        match &self.cache {
            Some(cache) => {
                for id in ids {
                    match cache.get(id).await {
                        Some(product) => snapshot.insert(product),
                        None => misses.push(*id),
                    }
                }
            }
            None => misses.extend_from_slice(ids),
        }

        if misses.is_empty() {
            debug!(products = ids.len(), "Catalog snapshot served from cache");
            return Ok(snapshot);
        }

        misses.sort_unstable();
        misses.dedup();
        let fetched = self.store.get_products(&misses).await?;
        debug!(
            requested = misses.len(),
            found = fetched.len(),
            "Fetched products from store"
        );

        if let Some(cache) = &self.cache {
            for product in &fetched {
                cache.insert(product.id, product.clone()).await;
            }
        }
        snapshot.extend(fetched);
        Ok(snapshot)
    }

    /// List the whole catalog, refreshing the cache with what was read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.store.list_products().await?;
        if let Some(cache) = &self.cache {
            for product in &products {
                cache.insert(product.id, product.clone()).await;
            }
        }
        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffeeshop_core::{CatalogLookup, Price};

    use super::*;
    use crate::db::MemoryStore;

    fn tea() -> Product {
        Product::new("Tea", Price::from_units(2), "Tea")
    }

    #[tokio::test]
    async fn test_snapshot_skips_unknown_ids() {
        let tea = tea();
        let store = Arc::new(MemoryStore::with_products([tea.clone()]));
        let catalog = CatalogService::new(store, Some(Duration::from_secs(60)));

        let missing = ProductId::generate();
        let snapshot = catalog.snapshot(&[tea.id, missing]).await.unwrap();
        assert!(snapshot.contains(&tea.id));
        assert!(!snapshot.contains(&missing));
    }

    #[tokio::test]
    async fn test_cached_price_survives_store_change_until_listed() {
        let mut tea = tea();
        let store = Arc::new(MemoryStore::with_products([tea.clone()]));
        let catalog = CatalogService::new(store.clone(), Some(Duration::from_secs(60)));
        catalog.snapshot(&[tea.id]).await.unwrap();

        tea.price = Price::from_units(3);
        store
            .upsert_products(std::slice::from_ref(&tea))
            .await
            .unwrap();

        let cached = catalog.snapshot(&[tea.id]).await.unwrap();
        assert_eq!(cached.unit_price(&tea.id), Some(Price::from_units(2)));

        catalog.list().await.unwrap();
        let fresh = catalog.snapshot(&[tea.id]).await.unwrap();
        assert_eq!(fresh.unit_price(&tea.id), Some(Price::from_units(3)));
    }

    #[tokio::test]
    async fn test_disabled_cache_reads_through() {
        let mut tea = tea();
        let store = Arc::new(MemoryStore::with_products([tea.clone()]));
        let catalog = CatalogService::new(store.clone(), None);
        catalog.snapshot(&[tea.id]).await.unwrap();

        tea.price = Price::from_units(3);
        store
            .upsert_products(std::slice::from_ref(&tea))
            .await
            .unwrap();

        let snapshot = catalog.snapshot(&[tea.id]).await.unwrap();
        assert_eq!(snapshot.unit_price(&tea.id), Some(Price::from_units(3)));
    }
}
