//! Integration tests for the coffee shop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront (in-memory store unless a database URL is set)
//! cargo run -p coffeeshop-storefront
//!
//! # Run integration tests against it
//! cargo test -p coffeeshop-integration-tests -- --ignored
//! ```
//!
//! The server is expected at `STOREFRONT_BASE_URL` (default
//! `http://localhost:3001`) with the default catalog loaded.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// HTTP client bound to a running storefront.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Create a context for the server at [`storefront_base_url`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: storefront_base_url(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return the status and JSON body (`Null` if empty).
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.expect("Request failed");
        let status = response.status();
        let text = response.text().await.expect("Failed to read response");
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("Response is not JSON")
        };
        (status, value)
    }

    /// Register a customer and return their ID.
    ///
    /// # Panics
    ///
    /// Panics if the customer is not created.
    pub async fn create_customer(&self, name: &str) -> String {
        let (status, body) = self
            .request(
                reqwest::Method::POST,
                "/customers",
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create customer: {body}");
        body["customer_id"]
            .as_str()
            .expect("customer_id missing")
            .to_string()
    }

    /// Look up a catalog product ID by name.
    ///
    /// # Panics
    ///
    /// Panics if the product is not in the catalog.
    pub async fn product_id(&self, name: &str) -> String {
        let (status, body) = self.request(reqwest::Method::GET, "/products", None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .expect("product list")
            .iter()
            .find(|p| p["name"] == name)
            .and_then(|p| p["id"].as_str())
            .unwrap_or_else(|| panic!("product {name:?} not in catalog"))
            .to_string()
    }

    /// Set the quantity of a product in a customer's basket.
    pub async fn add_item(&self, customer: &str, product: &str, quantity: Value) -> (StatusCode, Value) {
        self.request(
            reqwest::Method::POST,
            &format!("/customers/{customer}/basket/items"),
            Some(json!({ "product_id": product, "quantity": quantity })),
        )
        .await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
