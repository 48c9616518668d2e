//! Product route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use coffeeshop_core::Product;

use crate::error::Result;
use crate::state::AppState;

/// Catalog listing, ordered by name.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.baskets().list_products().await?;
    Ok(Json(products))
}
