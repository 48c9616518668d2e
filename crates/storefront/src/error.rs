//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Error responses are JSON with a stable machine-readable code:
//!
//! ```json
//! { "error": "payment_method_rejected", "message": "Cash is not accepted for totals over 10.00" }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Basket service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    /// HTTP status and stable error code for this error.
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Service(err) => match err {
                ServiceError::InvalidIdentifier { .. } => {
                    (StatusCode::BAD_REQUEST, "invalid_identifier")
                }
                ServiceError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, "invalid_quantity"),
                ServiceError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                ServiceError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "customer_not_found"),
                ServiceError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "product_not_found"),
                ServiceError::PaymentMethodRejected { .. } => {
                    (StatusCode::BAD_REQUEST, "payment_method_rejected")
                }
                ServiceError::BasketFinalized => (StatusCode::CONFLICT, "basket_finalized"),
                ServiceError::PersistenceConflict(_) => {
                    (StatusCode::CONFLICT, "persistence_conflict")
                }
                ServiceError::UpstreamUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable")
                }
                ServiceError::Repository(_) | ServiceError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(ServiceError::UpstreamUnavailable(_)) => {
                "Service temporarily unavailable".to_string()
            }
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                "Internal server error".to_string()
            }
            Self::Service(err) => err.to_string(),
            Self::NotFound(what) | Self::BadRequest(what) | Self::Internal(what) => what.clone(),
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context to the customer a request acts for.
pub fn set_sentry_customer(customer_id: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_owned()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for customer actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("basket", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffeeshop_core::{CustomerId, IdError, PaymentMethod, Price, ProductId, QuantityError};

    use super::*;
    use crate::db::RepositoryError;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("/nowhere".to_string());
        assert_eq!(err.to_string(), "Not found: /nowhere");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_service_error_codes() {
        fn code(err: ServiceError) -> (StatusCode, &'static str) {
            AppError::from(err).status_and_code()
        }

        assert_eq!(
            code(ServiceError::InvalidIdentifier {
                field: "customer",
                source: IdError::Empty,
            }),
            (StatusCode::BAD_REQUEST, "invalid_identifier")
        );
        assert_eq!(
            code(ServiceError::InvalidQuantity(QuantityError::NotPositive(0))),
            (StatusCode::BAD_REQUEST, "invalid_quantity")
        );
        assert_eq!(
            code(ServiceError::ProductNotFound(ProductId::generate())),
            (StatusCode::NOT_FOUND, "product_not_found")
        );
        assert_eq!(
            code(ServiceError::CustomerNotFound(CustomerId::generate())),
            (StatusCode::NOT_FOUND, "customer_not_found")
        );
        assert_eq!(
            code(ServiceError::PaymentMethodRejected {
                total: Price::from_units(12),
                threshold: Price::from_units(10),
                method: PaymentMethod::Cash,
            }),
            (StatusCode::BAD_REQUEST, "payment_method_rejected")
        );
        assert_eq!(
            code(ServiceError::BasketFinalized),
            (StatusCode::CONFLICT, "basket_finalized")
        );
        assert_eq!(
            code(ServiceError::PersistenceConflict("stale".to_string())),
            (StatusCode::CONFLICT, "persistence_conflict")
        );
        assert_eq!(
            code(ServiceError::UpstreamUnavailable(RepositoryError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable")
        );
        assert_eq!(
            code(ServiceError::Repository(RepositoryError::NotFound)),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let (status, body) = body_of(AppError::from(ServiceError::PaymentMethodRejected {
            total: Price::from_units(12),
            threshold: Price::from_units(10),
            method: PaymentMethod::Cash,
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "payment_method_rejected");
        assert_eq!(
            body["message"],
            "Cash is not accepted for totals over 10.00"
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_of(AppError::from(ServiceError::Repository(
            RepositoryError::DataCorruption("secret table detail".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "Internal server error");
    }
}
