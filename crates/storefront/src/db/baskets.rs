//! Basket repository.
//!
//! A basket is one `storefront.basket` row plus its `storefront.basket_line`
//! rows. Saves rewrite the lines and bump `version` in one transaction, and
//! only when the stored version matches the one the caller loaded.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};

use coffeeshop_core::{
    Basket, BasketRecord, BasketStatus, CustomerId, LineItem, PaymentMethod, Price, ProductId,
    Quantity,
};

use super::RepositoryError;

/// Header and lines are read in two statements; one snapshot for both keeps
/// a concurrent save from mixing two versions.
const LOAD_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

#[derive(FromRow)]
struct BasketRow {
    customer_id: CustomerId,
    total: Decimal,
    discount: Decimal,
    payment_method: Option<String>,
    status: BasketStatus,
    version: i64,
}

#[derive(FromRow)]
struct LineRow {
    product_id: ProductId,
    quantity: i64,
}

fn corrupt(what: &str, customer_id: CustomerId, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid {what} on basket {customer_id}: {err}"))
}

fn hydrate(row: BasketRow, lines: Vec<LineRow>) -> Result<Basket, RepositoryError> {
    let id = row.customer_id;
    let items = lines
        .into_iter()
        .map(|line| {
            Quantity::new(line.quantity)
                .map(|quantity| LineItem {
                    product_id: line.product_id,
                    quantity,
                })
                .map_err(|e| corrupt("quantity", id, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Basket::from_record(BasketRecord {
        customer_id: id,
        items,
        total: Price::new(row.total).map_err(|e| corrupt("total", id, e))?,
        discount: Price::new(row.discount).map_err(|e| corrupt("discount", id, e))?,
        payment_method: row
            .payment_method
            .as_deref()
            .map(PaymentMethod::parse)
            .transpose()
            .map_err(|e| corrupt("payment method", id, e))?,
        status: row.status,
        version: row.version,
    }))
}

/// Repository for basket database operations.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    /// Create a new basket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a customer's basket with its lines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn load(&self, customer_id: CustomerId) -> Result<Option<Basket>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(LOAD_ISOLATION).execute(&mut *tx).await?;

        let row: Option<BasketRow> = sqlx::query_as(
            r"
            SELECT customer_id, total, discount, payment_method, status, version
            FROM storefront.basket
            WHERE customer_id = $1
            ",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines: Vec<LineRow> = sqlx::query_as(
            r"
            SELECT product_id, quantity
            FROM storefront.basket_line
            WHERE customer_id = $1
            ORDER BY position
            ",
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        hydrate(row, lines).map(Some)
    }

    /// Insert an empty basket for a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_empty<'e, E>(
        executor: E,
        customer_id: CustomerId,
    ) -> Result<(), RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r"
            INSERT INTO storefront.basket (customer_id)
            VALUES ($1)
            ",
        )
        .bind(customer_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Compare-and-swap save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the stored version moved on,
    /// `RepositoryError::NotFound` if there is no basket for the customer.
    pub async fn save(&self, basket: &Basket) -> Result<Basket, RepositoryError> {
        let customer_id = basket.customer_id();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE storefront.basket
            SET total = $2,
                discount = $3,
                payment_method = $4,
                status = $5,
                version = version + 1,
                updated_at = now()
            WHERE customer_id = $1 AND version = $6
            ",
        )
        .bind(customer_id)
        .bind(basket.total().amount())
        .bind(basket.discount().amount())
        .bind(basket.payment_method().map(PaymentMethod::as_str))
        .bind(basket.status())
        .bind(basket.version())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT version FROM storefront.basket WHERE customer_id = $1")
                    .bind(customer_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match exists {
                Some((stored,)) => RepositoryError::Conflict(format!(
                    "basket {customer_id} is at version {stored}, expected {}",
                    basket.version()
                )),
                None => RepositoryError::NotFound,
            });
        }

        sqlx::query("DELETE FROM storefront.basket_line WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in (0_i32..).zip(basket.items()) {
            sqlx::query(
                r"
                INSERT INTO storefront.basket_line (customer_id, product_id, position, quantity)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(customer_id)
            .bind(item.product_id)
            .bind(position)
            .bind(i64::from(item.quantity.get()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(basket.committed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_one_snapshot() {
        assert!(LOAD_ISOLATION.starts_with("SET TRANSACTION"));
        assert!(LOAD_ISOLATION.contains("REPEATABLE READ"));
    }
}
