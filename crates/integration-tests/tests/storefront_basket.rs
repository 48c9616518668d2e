//! Integration tests for the storefront basket API.
//!
//! These tests require:
//! - The storefront server running (cargo run -p coffeeshop-storefront)
//! - The default catalog loaded (in-memory store, or `coffeeshop-cli seed`)
//!
//! Run with: cargo test -p coffeeshop-integration-tests -- --ignored

use coffeeshop_integration_tests::TestContext;
use reqwest::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_and_readiness() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

// ============================================================================
// Basket
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_add_update_and_remove_items() {
    let ctx = TestContext::new();
    let customer = ctx.create_customer("Integration Ada").await;
    let tea = ctx.product_id("Tea").await;

    let (status, body) = ctx.add_item(&customer, &tea, json!(2)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], "4.00");

    let (status, body) = ctx.add_item(&customer, &tea, json!("3")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["total"], "6.00");

    let (status, body) = ctx
        .request(
            Method::DELETE,
            &format!("/customers/{customer}/basket/items/{tea}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], "0.00");
    assert!(body["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_error_codes() {
    let ctx = TestContext::new();
    let customer = ctx.create_customer("Integration Grace").await;
    let tea = ctx.product_id("Tea").await;

    let (status, body) = ctx.add_item(&customer, &tea, json!(0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_quantity");

    let (status, body) = ctx
        .request(Method::GET, "/customers/not-an-id/basket", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_identifier");

    let (status, body) = ctx
        .request(
            Method::GET,
            &format!("/customers/{}/basket", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "customer_not_found");

    let (status, body) = ctx
        .add_item(&customer, &Uuid::new_v4().to_string(), json!(1))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "product_not_found");
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_discount_and_checkout() {
    let ctx = TestContext::new();
    let customer = ctx.create_customer("Integration Linus").await;
    let chocolate = ctx.product_id("Chocolate").await;
    ctx.add_item(&customer, &chocolate, json!(4)).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            &format!("/customers/{customer}/basket/discount"),
            Some(json!({ "discount_code": "DISCOUNT10" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], "12.00");
    assert_eq!(body["message"], "Discount applied successfully!");

    let checkout = format!("/customers/{customer}/checkout");
    let (status, body) = ctx
        .request(
            Method::POST,
            &checkout,
            Some(json!({ "discount_code": "DISCOUNT10", "payment_method": "Cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "payment_method_rejected");

    let (status, body) = ctx
        .request(
            Method::POST,
            &checkout,
            Some(json!({ "discount_code": "DISCOUNT10", "payment_method": "Credit Card" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Order placed successfully!");
    assert_eq!(body["total"], "12.00");
    assert_eq!(body["customer_name"], "Integration Linus");
    assert_eq!(body["basket"]["status"], "finalized");
}
