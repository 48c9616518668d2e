//! Business logic services for storefront.
//!
//! # Services
//!
//! - `basket` - Customer-facing basket, discount and checkout operations
//! - `catalog` - Product lookups with a `moka` cache in front of the store

pub mod basket;
pub mod catalog;

pub use basket::{BasketService, ServiceError};
pub use catalog::CatalogService;
