//! Response shapes returned by the basket service.

use serde::Serialize;

use coffeeshop_core::{
    Basket, BasketError, BasketStatus, CatalogLookup, Customer, CustomerId, CustomerName,
    DiscountPreview, PaymentMethod, Price, ProductId, Quantity,
};

/// Message returned with a discount preview.
pub const DISCOUNT_APPLIED_MESSAGE: &str = "Discount applied successfully!";
/// Message returned with a checkout confirmation.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// A line item with its product resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketLineView {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: Price,
    pub quantity: Quantity,
    pub line_total: Price,
}

/// A basket with resolved products and its current total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketView {
    pub customer_id: CustomerId,
    pub items: Vec<BasketLineView>,
    pub item_count: u64,
    pub discount: Price,
    pub total: Price,
    pub payment_method: Option<PaymentMethod>,
    pub status: BasketStatus,
    pub version: i64,
}

impl BasketView {
    /// Render `basket` against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::ProductNotFound` if a line no longer resolves.
    pub fn build<C>(basket: &Basket, catalog: &C) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        let items = basket
            .items()
            .iter()
            .map(|item| {
                let product = catalog
                    .product(&item.product_id)
                    .ok_or(BasketError::ProductNotFound(item.product_id))?;
                Ok(BasketLineView {
                    product_id: product.id,
                    name: product.name.clone(),
                    category: product.category.clone(),
                    image: product.image.clone(),
                    unit_price: product.price,
                    quantity: item.quantity,
                    line_total: item.line_total(catalog)?,
                })
            })
            .collect::<Result<Vec<_>, BasketError>>()?;

        Ok(Self {
            customer_id: basket.customer_id(),
            items,
            item_count: basket.item_count(),
            discount: basket.discount(),
            total: basket.current_total(catalog)?,
            payment_method: basket.payment_method().cloned(),
            status: basket.status(),
            version: basket.version(),
        })
    }
}

/// Result of a discount preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountView {
    pub subtotal: Price,
    pub discount: Price,
    pub total: Price,
    pub code_recognized: bool,
    pub message: &'static str,
}

impl From<DiscountPreview> for DiscountView {
    fn from(preview: DiscountPreview) -> Self {
        Self {
            subtotal: preview.subtotal,
            discount: preview.discount,
            total: preview.total,
            code_recognized: preview.recognized,
            message: DISCOUNT_APPLIED_MESSAGE,
        }
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutConfirmation {
    pub message: &'static str,
    pub customer_id: CustomerId,
    pub customer_name: CustomerName,
    pub total: Price,
    pub discount: Price,
    pub payment_method: PaymentMethod,
    pub basket: BasketView,
}

impl CheckoutConfirmation {
    #[must_use]
    pub fn new(customer: &Customer, payment_method: PaymentMethod, basket: BasketView) -> Self {
        Self {
            message: ORDER_PLACED_MESSAGE,
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            total: basket.total,
            discount: basket.discount,
            payment_method,
            basket,
        }
    }
}

/// A newly created customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerCreated {
    pub customer_id: CustomerId,
    pub name: CustomerName,
}

impl From<&Customer> for CustomerCreated {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            name: customer.name.clone(),
        }
    }
}
