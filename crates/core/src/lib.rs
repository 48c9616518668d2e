//! Coffee Shop Core - Basket and checkout domain.
//!
//! This crate holds the business rules of the storefront:
//! - [`basket`] - Line items, total recomputation, discount preview and checkout
//! - [`discount`] - The closed table of recognized discount codes
//! - [`checkout`] - The payment-method gate and the finalized-basket policy
//! - [`catalog`] - The synchronous product lookup the basket prices against
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O, no
//! database access, no HTTP. Every basket operation takes a basket by reference
//! and returns a new basket (or an error), leaving the input untouched. The
//! storefront loads, applies and saves with a version check, which makes each
//! operation a single transaction.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities, names and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod product;
pub mod types;

pub use basket::{Basket, BasketCommand, BasketRecord, BasketRules, DiscountPreview, LineItem};
pub use catalog::{CatalogLookup, CatalogSnapshot};
pub use checkout::{CheckoutGate, FinalizedPolicy};
pub use discount::{DiscountPolicy, DiscountRule};
pub use error::BasketError;
pub use product::{Customer, Product};
pub use types::*;
