//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Liveness check
//! GET    /health/ready                            - Readiness check (store reachable)
//!
//! # Catalog
//! GET    /products                                - Product listing
//!
//! # Customers
//! POST   /customers                               - Register a customer
//!
//! # Basket
//! GET    /customers/{id}/basket                   - Basket with total
//! POST   /customers/{id}/basket/items             - Set item quantity
//! DELETE /customers/{id}/basket/items/{product}   - Remove item
//! POST   /customers/{id}/basket/discount          - Preview a discount code
//! POST   /customers/{id}/checkout                 - Place the order
//! ```
//!
//! Unknown paths answer with a JSON `not_found` error.

pub mod basket;
pub mod customers;
pub mod health;
pub mod products;

use axum::{
    Router,
    http::Uri,
    routing::{delete, get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the customer and basket routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create))
        .route("/{customer_id}/basket", get(basket::show))
        .route("/{customer_id}/basket/items", post(basket::add_item))
        .route(
            "/{customer_id}/basket/items/{product_id}",
            delete(basket::remove_item),
        )
        .route(
            "/{customer_id}/basket/discount",
            post(basket::preview_discount),
        )
        .route("/{customer_id}/checkout", post(basket::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products", get(products::index))
        .nest("/customers", customer_routes())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
