//! Basket and checkout route handlers.
//!
//! Identifiers arrive as raw strings and are validated by the basket service,
//! so a malformed ID is reported as `invalid_identifier` rather than a routing
//! error.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use coffeeshop_core::{Quantity, QuantityError};

use crate::error::{AppError, Result, add_breadcrumb, set_sentry_customer};
use crate::services::ServiceError;
use crate::services::basket::{BasketView, CheckoutConfirmation, DiscountView};
use crate::state::AppState;

/// Body of `POST /customers/{id}/basket/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub product_id: String,
    /// A JSON integer or a numeric string; absent or `null` means 1.
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Body of `POST /customers/{id}/basket/discount`.
#[derive(Debug, Default, Deserialize)]
pub struct DiscountRequest {
    #[serde(default)]
    pub discount_code: Option<String>,
}

/// Body of `POST /customers/{id}/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub payment_method: String,
}

/// Interpret the `quantity` field of an add-item request.
fn parse_quantity(value: Option<&Value>) -> std::result::Result<Quantity, QuantityError> {
    match value {
        None | Some(Value::Null) => Ok(Quantity::ONE),
        Some(Value::Number(n)) => n
            .as_i64()
            .map_or_else(|| Err(QuantityError::NotANumber(n.to_string())), Quantity::new),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(QuantityError::NotANumber(other.to_string())),
    }
}

/// Current basket with resolved products and total.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<BasketView>> {
    set_sentry_customer(&customer_id);
    let view = state.baskets().get_basket(&customer_id).await?;
    Ok(Json(view))
}

/// Set the quantity of a product in the basket.
#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<BasketView>> {
    let Json(request) = payload?;
    set_sentry_customer(&customer_id);

    let quantity =
        parse_quantity(request.quantity.as_ref()).map_err(ServiceError::InvalidQuantity)?;
    let view = state
        .baskets()
        .add_item(&customer_id, &request.product_id, quantity)
        .await?;

    add_breadcrumb(
        "basket",
        "Set item quantity",
        Some(&[
            ("product_id", request.product_id.as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );
    Ok(Json(view))
}

/// Remove a product from the basket.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(String, String)>,
) -> Result<Json<BasketView>> {
    set_sentry_customer(&customer_id);
    let view = state
        .baskets()
        .remove_item(&customer_id, &product_id)
        .await?;

    add_breadcrumb(
        "basket",
        "Removed item",
        Some(&[("product_id", product_id.as_str())]),
    );
    Ok(Json(view))
}

/// Price a discount code against the basket without saving it.
///
/// The body is optional; an empty body previews without a code.
#[instrument(skip(state, body))]
pub async fn preview_discount(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    body: Bytes,
) -> Result<Json<DiscountView>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        DiscountRequest::default()
    } else {
        serde_json::from_slice::<DiscountRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid discount request: {e}")))?
    };
    set_sentry_customer(&customer_id);

    let view = state
        .baskets()
        .preview_discount(&customer_id, request.discount_code.as_deref())
        .await?;
    Ok(Json(view))
}

/// Apply a discount code, check the payment method and place the order.
#[instrument(skip(state, payload))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutConfirmation>> {
    let Json(request) = payload?;
    set_sentry_customer(&customer_id);

    let confirmation = state
        .baskets()
        .checkout(
            &customer_id,
            request.discount_code.as_deref(),
            &request.payment_method,
        )
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("payment_method", confirmation.payment_method.as_str())]),
    );
    Ok(Json(confirmation))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: &Value) -> std::result::Result<u32, QuantityError> {
        parse_quantity(Some(value)).map(|q| q.get())
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None).unwrap(), Quantity::ONE);
        assert_eq!(parse_quantity(Some(&Value::Null)).unwrap(), Quantity::ONE);
    }

    #[test]
    fn test_integer_and_numeric_string_quantities() {
        assert_eq!(parse(&json!(3)).unwrap(), 3);
        assert_eq!(parse(&json!("5")).unwrap(), 5);
        assert_eq!(parse(&json!(" 2 ")).unwrap(), 2);
    }

    #[test]
    fn test_rejected_quantities() {
        assert!(matches!(
            parse(&json!(0)),
            Err(QuantityError::NotPositive(0))
        ));
        assert!(matches!(
            parse(&json!(-4)),
            Err(QuantityError::NotPositive(-4))
        ));
        assert!(matches!(
            parse(&json!(1.5)),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            parse(&json!("two")),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            parse(&json!([1])),
            Err(QuantityError::NotANumber(_))
        ));
        assert!(matches!(
            parse(&json!(true)),
            Err(QuantityError::NotANumber(_))
        ));
    }
}
