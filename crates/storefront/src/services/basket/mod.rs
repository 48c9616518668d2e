//! Basket service.
//!
//! Customer-facing basket operations. Every operation validates identifiers
//! before touching the store, then runs one load, apply, save cycle:
//!
//! 1. Load the basket (its version comes with it)
//! 2. Resolve the products it references into a catalog snapshot
//! 3. Apply the pure basket operation from `coffeeshop_core`
//! 4. Save with a version check; a lost race is reported, never retried
//!
//! Operations that leave the basket unchanged skip the save.

mod error;
mod views;

pub use error::ServiceError;
pub use views::{
    BasketLineView, BasketView, CheckoutConfirmation, CustomerCreated, DISCOUNT_APPLIED_MESSAGE,
    DiscountView, ORDER_PLACED_MESSAGE,
};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use coffeeshop_core::{
    Basket, BasketCommand, BasketRules, CatalogSnapshot, Customer, CustomerId, CustomerName,
    PaymentMethod, Product, ProductId, Quantity,
};

use crate::db::Store;
use crate::services::catalog::CatalogService;

/// Basket operations over a [`Store`].
#[derive(Clone)]
pub struct BasketService {
    store: Arc<dyn Store>,
    catalog: CatalogService,
    rules: Arc<BasketRules>,
}

impl BasketService {
    /// Create a new basket service.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, catalog: CatalogService, rules: BasketRules) -> Self {
        Self {
            store,
            catalog,
            rules: Arc::new(rules),
        }
    }

    // =========================================================================
    // Customers & Catalog
    // =========================================================================

    /// Create a customer with an empty basket.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidRequest` if the name is blank or too long.
    #[instrument(skip(self))]
    pub async fn create_customer(&self, name: &str) -> Result<Customer, ServiceError> {
        let name =
            CustomerName::parse(name).map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
        let customer = Customer::new(name);
        self.store.create_customer(&customer).await?;

        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// List the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.catalog.list().await?)
    }

    // =========================================================================
    // Basket
    // =========================================================================

    /// View a basket and its current total.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` for a malformed customer ID
    /// - `ServiceError::CustomerNotFound` if the customer does not exist
    /// - `ServiceError::ProductNotFound` if a line's product left the catalog
    #[instrument(skip(self))]
    pub async fn get_basket(&self, customer_id: &str) -> Result<BasketView, ServiceError> {
        let customer_id = parse_customer_id(customer_id)?;
        let basket = self.load(customer_id).await?;
        let snapshot = self.snapshot(&basket, None).await?;
        Ok(BasketView::build(&basket, &snapshot)?)
    }

    /// Set the quantity of a product on a basket.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` for a malformed ID
    /// - `ServiceError::CustomerNotFound` / `ServiceError::ProductNotFound`
    /// - `ServiceError::BasketFinalized` under the locked policy
    /// - `ServiceError::PersistenceConflict` if the basket changed concurrently
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> Result<BasketView, ServiceError> {
        let customer_id = parse_customer_id(customer_id)?;
        let product_id = parse_product_id(product_id)?;

        let basket = self.load(customer_id).await?;
        let snapshot = self.snapshot(&basket, Some(product_id)).await?;
        if !snapshot.contains(&product_id) {
            return Err(ServiceError::ProductNotFound(product_id));
        }

        let next = basket.apply(
            &snapshot,
            &self.rules,
            BasketCommand::AddOrUpdate {
                product_id,
                quantity,
            },
        )?;
        let saved = self.commit(&basket, next).await?;

        debug!(total = %saved.total(), "Basket updated");
        Ok(BasketView::build(&saved, &snapshot)?)
    }

    /// Remove a product from a basket. Removing an absent product succeeds and
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` for a malformed ID
    /// - `ServiceError::CustomerNotFound` if the customer does not exist
    /// - `ServiceError::BasketFinalized` under the locked policy
    /// - `ServiceError::PersistenceConflict` if the basket changed concurrently
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        customer_id: &str,
        product_id: &str,
    ) -> Result<BasketView, ServiceError> {
        let customer_id = parse_customer_id(customer_id)?;
        let product_id = parse_product_id(product_id)?;

        let basket = self.load(customer_id).await?;
        let snapshot = self.snapshot(&basket, None).await?;
        let next = basket.apply(&snapshot, &self.rules, BasketCommand::Remove { product_id })?;
        let saved = self.commit(&basket, next).await?;

        debug!(total = %saved.total(), "Basket updated");
        Ok(BasketView::build(&saved, &snapshot)?)
    }

    /// Price a discount code against a basket without saving anything.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` for a malformed customer ID
    /// - `ServiceError::CustomerNotFound` if the customer does not exist
    /// - `ServiceError::ProductNotFound` if a line's product left the catalog
    #[instrument(skip(self))]
    pub async fn preview_discount(
        &self,
        customer_id: &str,
        discount_code: Option<&str>,
    ) -> Result<DiscountView, ServiceError> {
        let customer_id = parse_customer_id(customer_id)?;
        let basket = self.load(customer_id).await?;
        let snapshot = self.snapshot(&basket, None).await?;
        let preview = basket.preview_discount(&snapshot, &self.rules, discount_code)?;

        debug!(
            total = %preview.total,
            discount = %preview.discount,
            recognized = preview.recognized,
            "Discount previewed"
        );
        Ok(preview.into())
    }

    /// Apply a discount code, gate the payment method and finalize the basket.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidIdentifier` for a malformed customer ID
    /// - `ServiceError::InvalidRequest` for a blank payment method
    /// - `ServiceError::CustomerNotFound` if the customer does not exist
    /// - `ServiceError::PaymentMethodRejected` if the gate refuses the method;
    ///   nothing is saved
    /// - `ServiceError::BasketFinalized` under the locked policy
    /// - `ServiceError::PersistenceConflict` if the basket changed concurrently
    #[instrument(skip(self))]
    pub async fn checkout(
        &self,
        customer_id: &str,
        discount_code: Option<&str>,
        payment_method: &str,
    ) -> Result<CheckoutConfirmation, ServiceError> {
        let customer_id = parse_customer_id(customer_id)?;
        let payment_method = PaymentMethod::parse(payment_method)
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

        let customer = self
            .store
            .get_customer(customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;
        let basket = self.load(customer_id).await?;
        let snapshot = self.snapshot(&basket, None).await?;

        let next = basket
            .apply(
                &snapshot,
                &self.rules,
                BasketCommand::Checkout {
                    discount_code: discount_code.map(str::to_owned),
                    payment_method: payment_method.clone(),
                },
            )
            .inspect_err(|e| warn!(error = %e, "Checkout rejected"))?;
        let saved = self.commit(&basket, next).await?;

        info!(
            total = %saved.total(),
            discount = %saved.discount(),
            payment_method = %payment_method,
            "Order placed"
        );
        let view = BasketView::build(&saved, &snapshot)?;
        Ok(CheckoutConfirmation::new(&customer, payment_method, view))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load(&self, customer_id: CustomerId) -> Result<Basket, ServiceError> {
        self.store
            .load_basket(customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))
    }

    /// Resolve every product on `basket`, plus `extra` if given.
    async fn snapshot(
        &self,
        basket: &Basket,
        extra: Option<ProductId>,
    ) -> Result<CatalogSnapshot, ServiceError> {
        let ids: Vec<ProductId> = basket.product_ids().chain(extra).collect();
        Ok(self.catalog.snapshot(&ids).await?)
    }

    /// Save `next` unless it equals `loaded`.
    async fn commit(&self, loaded: &Basket, next: Basket) -> Result<Basket, ServiceError> {
        if next == *loaded {
            return Ok(next);
        }
        self.store.save_basket(&next).await.map_err(|e| {
            let err = ServiceError::from(e);
            if matches!(err, ServiceError::PersistenceConflict(_)) {
                warn!(customer_id = %next.customer_id(), "Basket save lost a race");
            }
            err
        })
    }
}

fn parse_customer_id(input: &str) -> Result<CustomerId, ServiceError> {
    CustomerId::parse(input).map_err(|source| ServiceError::InvalidIdentifier {
        field: "customer",
        source,
    })
}

fn parse_product_id(input: &str) -> Result<ProductId, ServiceError> {
    ProductId::parse(input).map_err(|source| ServiceError::InvalidIdentifier {
        field: "product",
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use coffeeshop_core::{BasketStatus, FinalizedPolicy, Price};

    use super::*;
    use crate::db::{MemoryStore, RepositoryError};

    struct Fixture {
        service: BasketService,
        store: Arc<MemoryStore>,
        customer: Customer,
        product: Product,
    }

    async fn fixture_with(cents: u32, rules: BasketRules) -> Fixture {
        let product = Product::new("Coke", Price::from_cents(cents), "Soft Drink");
        let store = Arc::new(MemoryStore::with_products([product.clone()]));
        let catalog = CatalogService::new(store.clone(), None);
        let service = BasketService::new(store.clone(), catalog, rules);
        let customer = service.create_customer("Ada").await.unwrap();
        Fixture {
            service,
            store,
            customer,
            product,
        }
    }

    async fn fixture(cents: u32) -> Fixture {
        fixture_with(cents, BasketRules::default()).await
    }

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_add_item_returns_priced_basket() {
        let f = fixture(200).await;
        let view = f
            .service
            .add_item(&f.customer.id.to_string(), &f.product.id.to_string(), qty(2))
            .await
            .unwrap();

        assert_eq!(view.total, Price::from_units(4));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Coke");
        assert_eq!(view.items[0].line_total, Price::from_units(4));
        assert_eq!(view.version, 1);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let f = fixture(200).await;
        let missing = ProductId::generate();
        let err = f
            .service
            .add_item(&f.customer.id.to_string(), &missing.to_string(), qty(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let f = fixture(200).await;
        let missing = CustomerId::generate();
        let err = f
            .service
            .get_basket(&missing.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CustomerNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_remove_absent_product_does_not_save() {
        let f = fixture(200).await;
        let customer_id = f.customer.id.to_string();
        let view = f
            .service
            .remove_item(&customer_id, &ProductId::generate().to_string())
            .await
            .unwrap();
        assert_eq!(view.version, 0);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let f = fixture(500).await;
        let customer_id = f.customer.id.to_string();
        f.service
            .add_item(&customer_id, &f.product.id.to_string(), qty(1))
            .await
            .unwrap();

        let preview = f
            .service
            .preview_discount(&customer_id, Some("DISCOUNT10"))
            .await
            .unwrap();
        assert_eq!(preview.total, Price::from_units(3));
        assert_eq!(preview.discount, Price::from_units(2));
        assert_eq!(preview.message, DISCOUNT_APPLIED_MESSAGE);

        let view = f.service.get_basket(&customer_id).await.unwrap();
        assert_eq!(view.total, Price::from_units(5));
        assert_eq!(view.discount, Price::ZERO);
        assert_eq!(view.status, BasketStatus::Open);
    }

    #[tokio::test]
    async fn test_checkout_confirmation() {
        let f = fixture(500).await;
        let customer_id = f.customer.id.to_string();
        f.service
            .add_item(&customer_id, &f.product.id.to_string(), qty(1))
            .await
            .unwrap();

        let confirmation = f
            .service
            .checkout(&customer_id, Some("DISCOUNT10"), "Credit Card")
            .await
            .unwrap();
        assert_eq!(confirmation.message, ORDER_PLACED_MESSAGE);
        assert_eq!(confirmation.total, Price::from_units(3));
        assert_eq!(confirmation.discount, Price::from_units(2));
        assert_eq!(confirmation.customer_name.as_str(), "Ada");
        assert_eq!(confirmation.payment_method, PaymentMethod::CreditCard);

        let stored = f.store.load_basket(f.customer.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), BasketStatus::Finalized);
    }

    #[tokio::test]
    async fn test_rejected_checkout_saves_nothing() {
        let f = fixture(700).await;
        let customer_id = f.customer.id.to_string();
        f.service
            .add_item(&customer_id, &f.product.id.to_string(), qty(2))
            .await
            .unwrap();
        let before = f.store.load_basket(f.customer.id).await.unwrap().unwrap();

        let err = f
            .service
            .checkout(&customer_id, Some("DISCOUNT10"), "Cash")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PaymentMethodRejected { .. }));

        let after = f.store.load_basket(f.customer.id).await.unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_blank_payment_method_is_invalid() {
        let f = fixture(200).await;
        let err = f
            .service
            .checkout(&f.customer.id.to_string(), None, "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_locked_policy_rejects_edits_after_checkout() {
        let rules = BasketRules {
            finalized: FinalizedPolicy::Locked,
            ..BasketRules::default()
        };
        let f = fixture_with(200, rules).await;
        let customer_id = f.customer.id.to_string();
        let product_id = f.product.id.to_string();
        f.service
            .add_item(&customer_id, &product_id, qty(1))
            .await
            .unwrap();
        f.service
            .checkout(&customer_id, None, "Cash")
            .await
            .unwrap();

        let err = f
            .service
            .add_item(&customer_id, &product_id, qty(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BasketFinalized));
    }

    #[tokio::test]
    async fn test_blank_customer_name_is_invalid() {
        let f = fixture(200).await;
        let err = f.service.create_customer("   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    /// A store that fails the test if it is ever called.
    struct UntouchableStore;

    #[async_trait]
    impl Store for UntouchableStore {
        async fn create_customer(&self, _: &Customer) -> Result<(), RepositoryError> {
            panic!("store reached")
        }
        async fn get_customer(&self, _: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            panic!("store reached")
        }
        async fn load_basket(&self, _: CustomerId) -> Result<Option<Basket>, RepositoryError> {
            panic!("store reached")
        }
        async fn save_basket(&self, _: &Basket) -> Result<Basket, RepositoryError> {
            panic!("store reached")
        }
        async fn get_products(&self, _: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
            panic!("store reached")
        }
        async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
            panic!("store reached")
        }
        async fn upsert_products(&self, _: &[Product]) -> Result<u64, RepositoryError> {
            panic!("store reached")
        }
        async fn replace_products(&self, _: &[Product]) -> Result<u64, RepositoryError> {
            panic!("store reached")
        }
        async fn ping(&self) -> Result<(), RepositoryError> {
            panic!("store reached")
        }
    }

    #[tokio::test]
    async fn test_malformed_ids_never_reach_store() {
        let store: Arc<dyn Store> = Arc::new(UntouchableStore);
        let service = BasketService::new(
            store.clone(),
            CatalogService::new(store, None),
            BasketRules::default(),
        );
        let valid = CustomerId::generate().to_string();

        for result in [
            service.get_basket("nonexistentid").await.map(|_| ()),
            service
                .add_item(&valid, "not-a-product", Quantity::ONE)
                .await
                .map(|_| ()),
            service.remove_item("", &valid).await.map(|_| ()),
            service.preview_discount("xyz", None).await.map(|_| ()),
            service.checkout("123", None, "Cash").await.map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(ServiceError::InvalidIdentifier { .. })
            ));
        }
    }

    /// A store where another writer saves right after every load.
    struct RacingStore(MemoryStore);

    #[async_trait]
    impl Store for RacingStore {
        async fn create_customer(&self, customer: &Customer) -> Result<(), RepositoryError> {
            self.0.create_customer(customer).await
        }
        async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.0.get_customer(id).await
        }
        async fn load_basket(&self, id: CustomerId) -> Result<Option<Basket>, RepositoryError> {
            let loaded = self.0.load_basket(id).await?;
            if let Some(basket) = &loaded {
                self.0.save_basket(basket).await?;
            }
            Ok(loaded)
        }
        async fn save_basket(&self, basket: &Basket) -> Result<Basket, RepositoryError> {
            self.0.save_basket(basket).await
        }
        async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
            self.0.get_products(ids).await
        }
        async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
            self.0.list_products().await
        }
        async fn upsert_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
            self.0.upsert_products(products).await
        }
        async fn replace_products(&self, products: &[Product]) -> Result<u64, RepositoryError> {
            self.0.replace_products(products).await
        }
        async fn ping(&self) -> Result<(), RepositoryError> {
            self.0.ping().await
        }
    }

    #[tokio::test]
    async fn test_lost_race_is_persistence_conflict() {
        let product = Product::new("Tea", Price::from_units(2), "Tea");
        let store: Arc<dyn Store> =
            Arc::new(RacingStore(MemoryStore::with_products([product.clone()])));
        let service = BasketService::new(
            store.clone(),
            CatalogService::new(store, None),
            BasketRules::default(),
        );
        let customer = service.create_customer("Grace").await.unwrap();

        let err = service
            .add_item(
                &customer.id.to_string(),
                &product.id.to_string(),
                Quantity::ONE,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PersistenceConflict(_)));
    }
}
