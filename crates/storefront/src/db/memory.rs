//! In-memory [`Store`] for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use coffeeshop_core::{Basket, Customer, CustomerId, Product, ProductId};

use super::{RepositoryError, Store};

#[derive(Default)]
struct Tables {
    customers: HashMap<CustomerId, Customer>,
    baskets: HashMap<CustomerId, Basket>,
    products: HashMap<ProductId, Product>,
}

/// [`Store`] kept in process memory. The version check on save happens under
/// the write lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose catalog holds `products`.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                products: products.into_iter().map(|p| (p.id, p)).collect(),
                ..Tables::default()
            }),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_customer(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.customers.contains_key(&customer.id) {
            return Err(RepositoryError::Conflict("customer already exists".to_owned()));
        }
        tables.customers.insert(customer.id, customer.clone());
        tables
            .baskets
            .insert(customer.id, Basket::new(customer.id));
        Ok(())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn load_basket(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Basket>, RepositoryError> {
        Ok(self.tables.read().await.baskets.get(&customer_id).cloned())
    }

    async fn save_basket(&self, basket: &Basket) -> Result<Basket, RepositoryError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .baskets
            .get_mut(&basket.customer_id())
            .ok_or(RepositoryError::NotFound)?;

        if stored.version() != basket.version() {
            return Err(RepositoryError::Conflict(format!(
                "basket {} is at version {}, expected {}",
                basket.customer_id(),
                stored.version(),
                basket.version()
            )));
        }

        let committed = basket.committed();
        *stored = committed.clone();
        Ok(committed)
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products: Vec<Product> =
            self.tables.read().await.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn upsert_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        for product in products {
            tables.products.insert(product.id, product.clone());
        }
        Ok(products.len() as u64)
    }

    async fn replace_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.products = products.iter().map(|p| (p.id, p.clone())).collect();
        Ok(products.len() as u64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
