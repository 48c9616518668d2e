//! Synchronous product lookup.
//!
//! Baskets only store product references. Pricing a basket needs the current
//! unit price of each referenced product, which is asked of a
//! [`CatalogLookup`]. The storefront resolves the products a request touches
//! up front and hands the basket a [`CatalogSnapshot`], so basket operations
//! stay pure and never wait on I/O.

use std::collections::HashMap;

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Resolves product IDs to catalog entries.
pub trait CatalogLookup {
    /// Look up a product.
    fn product(&self, id: &ProductId) -> Option<&Product>;

    /// Current unit price of a product.
    fn unit_price(&self, id: &ProductId) -> Option<Price> {
        self.product(id).map(|product| product.price)
    }
}

impl CatalogLookup for HashMap<ProductId, Product> {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.get(id)
    }
}

/// A set of products resolved for one operation.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<ProductId, Product>,
}

impl CatalogSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    /// Returns `true` if the snapshot holds `id`.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains_key(id)
    }

    /// Number of products in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogLookup for CatalogSnapshot {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }
}

impl FromIterator<Product> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl Extend<Product> for CatalogSnapshot {
    fn extend<I: IntoIterator<Item = Product>>(&mut self, iter: I) {
        for product in iter {
            self.insert(product);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let coke = Product::new("Coke", Price::from_units(2), "Soft Drink");
        let id = coke.id;
        let snapshot: CatalogSnapshot = std::iter::once(coke).collect();

        assert!(snapshot.contains(&id));
        assert_eq!(snapshot.unit_price(&id), Some(Price::from_units(2)));
        assert_eq!(snapshot.unit_price(&ProductId::generate()), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut coke = Product::new("Coke", Price::from_units(2), "Soft Drink");
        let mut snapshot = CatalogSnapshot::new();
        snapshot.insert(coke.clone());
        coke.price = Price::from_units(3);
        snapshot.insert(coke.clone());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.unit_price(&coke.id), Some(Price::from_units(3)));
    }
}
