//! Basket service error types.

use thiserror::Error;

use coffeeshop_core::{
    BasketError, CustomerId, IdError, PaymentMethod, Price, ProductId, QuantityError,
};

use crate::db::RepositoryError;

/// Errors that can occur during basket service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A customer or product reference is not a well-formed identifier.
    #[error("invalid {field} id: {source}")]
    InvalidIdentifier {
        field: &'static str,
        #[source]
        source: IdError,
    },

    /// Quantity is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Some other request field failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The checkout gate refused the payment method.
    #[error("{method} is not accepted for totals over {threshold}")]
    PaymentMethodRejected {
        total: Price,
        threshold: Price,
        method: PaymentMethod,
    },

    /// The basket is finalized and may not change.
    #[error("basket is finalized")]
    BasketFinalized,

    /// Another request saved the basket first.
    #[error("basket was modified concurrently: {0}")]
    PersistenceConflict(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    UpstreamUnavailable(#[source] RepositoryError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[source] RepositoryError),

    /// Arithmetic or invariant failure that is not the caller's fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(reason) => Self::PersistenceConflict(reason),
            err if err.is_unavailable() => Self::UpstreamUnavailable(err),
            err => Self::Repository(err),
        }
    }
}

impl From<BasketError> for ServiceError {
    fn from(err: BasketError) -> Self {
        match err {
            BasketError::InvalidQuantity(e) => Self::InvalidQuantity(e),
            BasketError::ProductNotFound(id) => Self::ProductNotFound(id),
            BasketError::PaymentMethodRejected {
                total,
                threshold,
                method,
            } => Self::PaymentMethodRejected {
                total,
                threshold,
                method,
            },
            BasketError::Finalized => Self::BasketFinalized,
            BasketError::AmountOverflow => {
                Self::Internal(BasketError::AmountOverflow.to_string())
            }
        }
    }
}
