//! Application state shared across handlers.

use std::sync::Arc;

use coffeeshop_core::BasketRules;

use crate::config::StorefrontConfig;
use crate::db::Store;
use crate::services::{BasketService, CatalogService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store, the basket service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn Store>,
    baskets: BasketService,
}

impl AppState {
    /// Create a new application state over `store`.
    ///
    /// Basket rules use the standard discount table and checkout gate, with
    /// the finalized-basket policy taken from `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn Store>) -> Self {
        let catalog = CatalogService::new(store.clone(), config.catalog_cache_ttl);
        let rules = BasketRules {
            finalized: config.finalized_policy,
            ..BasketRules::default()
        };
        let baskets = BasketService::new(store.clone(), catalog, rules);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                baskets,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the basket service.
    #[must_use]
    pub fn baskets(&self) -> &BasketService {
        &self.inner.baskets
    }
}
