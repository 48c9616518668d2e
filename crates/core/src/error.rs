//! Basket domain errors.

use thiserror::Error;

use crate::types::{PaymentMethod, Price, ProductId, QuantityError};

/// Errors that reject a basket operation.
///
/// A rejected operation never produces a partially mutated basket: every
/// operation returns either a complete new basket or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasketError {
    /// The requested quantity is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// A referenced product does not resolve in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The checkout gate refused the payment method for this total.
    #[error("{method} is not accepted for totals over {threshold} (total is {total})")]
    PaymentMethodRejected {
        /// Total after discount.
        total: Price,
        /// Largest total the method is accepted for.
        threshold: Price,
        /// The refused method.
        method: PaymentMethod,
    },

    /// The basket is finalized and the policy forbids further changes.
    #[error("basket is finalized")]
    Finalized,

    /// A line or basket total does not fit in a decimal.
    #[error("basket total overflowed")]
    AmountOverflow,
}
