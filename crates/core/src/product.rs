//! Catalog and customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, CustomerName, Price, ProductId};

/// A product in the catalog.
///
/// Immutable from the basket's point of view; only the catalog changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price of one unit.
    pub price: Price,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Per-product discount. Recorded on the catalog entry but not used by
    /// checkout, which only applies code-based discounts.
    #[serde(default)]
    pub discount: Price,
}

impl Product {
    /// Create a product with a fresh ID, no image and no per-product discount.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price, category: impl Into<String>) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            price,
            category: category.into(),
            image: None,
            discount: Price::ZERO,
        }
    }
}

/// A customer. Owns exactly one basket, keyed by the customer ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: CustomerName,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer with a fresh ID.
    #[must_use]
    pub fn new(name: CustomerName) -> Self {
        Self {
            id: CustomerId::generate(),
            name,
            created_at: Utc::now(),
        }
    }
}
