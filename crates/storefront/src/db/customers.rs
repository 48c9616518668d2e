//! Customer repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};

use coffeeshop_core::{Customer, CustomerId, CustomerName};

use super::{RepositoryError, conflict_on_unique};

#[derive(FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let name = CustomerName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid customer name in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            name,
            created_at: row.created_at,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored name is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row: Option<CustomerRow> = sqlx::query_as(
            r"
            SELECT id, name, created_at
            FROM storefront.customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Insert a customer row.
    ///
    /// Takes any executor so it can run inside the transaction that also
    /// creates the customer's basket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID already exists.
    pub async fn insert<'e, E>(executor: E, customer: &Customer) -> Result<(), RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r"
            INSERT INTO storefront.customer (id, name, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(customer.id)
        .bind(customer.name.as_str())
        .bind(customer.created_at)
        .execute(executor)
        .await
        .map_err(|e| conflict_on_unique(e, "customer"))?;

        Ok(())
    }
}
