//! Product repository.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use coffeeshop_core::{Price, Product, ProductId};

use super::RepositoryError;

#[derive(FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    category: String,
    image: Option<String>,
    discount: Decimal,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        let discount = Price::new(row.discount).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid discount for product {}: {e}", row.id))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            price,
            category: row.category,
            image: row.image,
            discount,
        })
    }
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the products with the given IDs. Unknown IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored amount is negative.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, category, image, discount
            FROM storefront.product
            WHERE id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List the whole catalog ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, category, image, discount
            FROM storefront.product
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert or update products by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a write fails; nothing is
    /// written in that case.
    pub async fn upsert(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let written = upsert_all(&mut tx, products).await?;
        tx.commit().await?;
        Ok(written)
    }

    /// Delete every product and insert `products`.
    ///
    /// Line items keep their product references; baskets that point at a
    /// product that no longer exists fail to price until it is removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a write fails; nothing is
    /// written in that case.
    pub async fn replace_all(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM storefront.product")
            .execute(&mut *tx)
            .await?;
        let written = upsert_all(&mut tx, products).await?;
        tx.commit().await?;
        Ok(written)
    }
}

async fn upsert_all(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    products: &[Product],
) -> Result<u64, RepositoryError> {
    let mut written = 0;
    for product in products {
        let result = sqlx::query(
            r"
            INSERT INTO storefront.product (id, name, price, category, image, discount)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                category = EXCLUDED.category,
                image = EXCLUDED.image,
                discount = EXCLUDED.discount,
                updated_at = now()
            ",
        )
        .bind(product.id)
        .bind(product.name.as_str())
        .bind(product.price.amount())
        .bind(product.category.as_str())
        .bind(product.image.as_deref())
        .bind(product.discount.amount())
        .execute(&mut **tx)
        .await?;
        written += result.rows_affected();
    }
    Ok(written)
}
