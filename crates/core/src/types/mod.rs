//! Core types for the coffee shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod name;
pub mod payment;
pub mod price;
pub mod quantity;
pub mod status;

pub use id::*;
pub use name::{CustomerName, NameError};
pub use payment::{PaymentMethod, PaymentMethodError};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use status::*;
