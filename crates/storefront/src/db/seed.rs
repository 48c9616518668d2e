//! Catalog seed data.
//!
//! The default catalog uses fixed IDs so reseeding updates the same rows.
//! Catalog files may omit `id`; such entries get a fresh ID on every load and
//! are best seeded with `--replace`.

use serde::Deserialize;
use uuid::Uuid;

use coffeeshop_core::{Price, Product, ProductId};

/// One product in a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub discount: Price,
}

impl From<CatalogEntry> for Product {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id.unwrap_or_else(ProductId::generate),
            name: entry.name,
            price: entry.price,
            category: entry.category,
            image: entry.image,
            discount: entry.discount,
        }
    }
}

/// A catalog file.
///
/// ```yaml
/// products:
///   - name: Tea
///     price: "2.00"
///     category: Tea
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<CatalogEntry>,
}

impl CatalogFile {
    /// Convert every entry into a catalog product.
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.products.into_iter().map(Product::from).collect()
    }
}

const ITALIAN_COFFEE: u128 = 0x6f1c_3d2a_0b5e_4c1a_9a31_0000_0000_0001;
const AMERICAN_COFFEE: u128 = 0x6f1c_3d2a_0b5e_4c1a_9a31_0000_0000_0002;
const TEA: u128 = 0x6f1c_3d2a_0b5e_4c1a_9a31_0000_0000_0003;
const CHOCOLATE: u128 = 0x6f1c_3d2a_0b5e_4c1a_9a31_0000_0000_0004;

fn seeded(id: u128, name: &str, cents: u32, category: &str) -> Product {
    Product {
        id: ProductId::from_uuid(Uuid::from_u128(id)),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        category: category.to_owned(),
        image: None,
        discount: Price::ZERO,
    }
}

/// The catalog a fresh shop starts with.
#[must_use]
pub fn default_catalog() -> Vec<Product> {
    vec![
        seeded(ITALIAN_COFFEE, "Italian Coffee", 300, "Coffee"),
        seeded(AMERICAN_COFFEE, "American Coffee", 250, "Coffee"),
        seeded(TEA, "Tea", 200, "Tea"),
        seeded(CHOCOLATE, "Chocolate", 350, "Hot Beverage"),
    ]
}
