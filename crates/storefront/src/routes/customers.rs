//! Customer route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, set_sentry_customer};
use crate::services::basket::CustomerCreated;
use crate::state::AppState;

/// Body of `POST /customers`.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: String,
}

/// Register a customer and open an empty basket for them.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerCreated>)> {
    let Json(request) = payload?;
    let customer = state.baskets().create_customer(&request.name).await?;

    let customer_id = customer.id.to_string();
    set_sentry_customer(&customer_id);
    add_breadcrumb("customer", "Customer created", None);

    Ok((StatusCode::CREATED, Json(CustomerCreated::from(&customer))))
}
