//! `PostgreSQL`-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use coffeeshop_core::{Basket, Customer, CustomerId, Product, ProductId};

use super::{
    BasketRepository, CustomerRepository, ProductRepository, RepositoryError, Store,
};

/// [`Store`] over a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_customer(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        CustomerRepository::insert(&mut *tx, customer).await?;
        BasketRepository::insert_empty(&mut *tx, customer.id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool).get_by_id(id).await
    }

    async fn load_basket(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Basket>, RepositoryError> {
        BasketRepository::new(&self.pool).load(customer_id).await
    }

    async fn save_basket(&self, basket: &Basket) -> Result<Basket, RepositoryError> {
        BasketRepository::new(&self.pool).save(basket).await
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_many(ids).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list().await
    }

    async fn upsert_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).upsert(products).await
    }

    async fn replace_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).replace_all(products).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
