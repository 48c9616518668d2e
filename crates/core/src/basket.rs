//! Basket state and operations.
//!
//! Every operation borrows the current basket and returns a new one, so a
//! rejected operation leaves nothing behind. The total is never trusted from
//! storage: each operation that changes line items recomputes it from the
//! catalog before returning.
//!
//! ```text
//!            add / remove                 checkout
//!   +------+ -----------> +------+  -----------------> +-----------+
//!   | Open |              | Open |                     | Finalized |
//!   +------+ <----------- +------+  <- add / remove -- +-----------+
//!                                      (Reopen policy only)
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogLookup;
use crate::checkout::{CheckoutGate, FinalizedPolicy};
use crate::discount::DiscountPolicy;
use crate::error::BasketError;
use crate::types::{BasketStatus, CustomerId, PaymentMethod, Price, ProductId, Quantity};

/// One product on a basket with its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl LineItem {
    /// Unit price times quantity, priced against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::ProductNotFound` if the product does not resolve
    /// and `BasketError::AmountOverflow` if the product does not fit a decimal.
    pub fn line_total<C>(&self, catalog: &C) -> Result<Price, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        let unit = catalog
            .unit_price(&self.product_id)
            .ok_or(BasketError::ProductNotFound(self.product_id))?;
        unit.checked_mul(self.quantity)
            .ok_or(BasketError::AmountOverflow)
    }
}

/// Rules a basket operation is evaluated under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketRules {
    pub discounts: DiscountPolicy,
    pub gate: CheckoutGate,
    pub finalized: FinalizedPolicy,
}

/// A requested change to a basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasketCommand {
    /// Set the quantity of a product, adding a line if it is not there yet.
    AddOrUpdate {
        product_id: ProductId,
        quantity: Quantity,
    },
    /// Drop the line for a product. Removing an absent product is a no-op.
    Remove { product_id: ProductId },
    /// Apply a discount code, gate the payment method and finalize.
    Checkout {
        discount_code: Option<String>,
        payment_method: PaymentMethod,
    },
}

/// Result of pricing a discount code against a basket without committing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPreview {
    /// Total before the discount.
    pub subtotal: Price,
    /// Discount the code grants.
    pub discount: Price,
    /// Total after the discount, floored at zero.
    pub total: Price,
    /// Whether the code is in the discount table.
    pub recognized: bool,
}

/// Plain field-by-field form of a [`Basket`], used by stores to hydrate and
/// persist baskets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRecord {
    pub customer_id: CustomerId,
    pub items: Vec<LineItem>,
    pub total: Price,
    pub discount: Price,
    pub payment_method: Option<PaymentMethod>,
    pub status: BasketStatus,
    pub version: i64,
}

/// A customer's basket.
///
/// ## Invariants
///
/// - At most one line per product, each with a quantity of at least 1
/// - Lines keep insertion order
/// - `total` is the sum of line totals minus `discount`, floored at zero
/// - `discount` and `payment_method` are only set on a finalized basket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    customer_id: CustomerId,
    items: Vec<LineItem>,
    total: Price,
    discount: Price,
    payment_method: Option<PaymentMethod>,
    status: BasketStatus,
    version: i64,
}

impl Basket {
    /// Create an empty, open basket for a customer.
    #[must_use]
    pub const fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            items: Vec::new(),
            total: Price::ZERO,
            discount: Price::ZERO,
            payment_method: None,
            status: BasketStatus::Open,
            version: 0,
        }
    }

    /// Rebuild a basket from its stored form.
    #[must_use]
    pub fn from_record(record: BasketRecord) -> Self {
        Self {
            customer_id: record.customer_id,
            items: record.items,
            total: record.total,
            discount: record.discount,
            payment_method: record.payment_method,
            status: record.status,
            version: record.version,
        }
    }

    /// The stored form of this basket.
    #[must_use]
    pub fn to_record(&self) -> BasketRecord {
        BasketRecord {
            customer_id: self.customer_id,
            items: self.items.clone(),
            total: self.total,
            discount: self.discount,
            payment_method: self.payment_method.clone(),
            status: self.status,
            version: self.version,
        }
    }

    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total as of the last committed operation.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub const fn discount(&self) -> Price {
        self.discount
    }

    #[must_use]
    pub const fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    #[must_use]
    pub const fn status(&self) -> BasketStatus {
        self.status
    }

    /// Optimistic concurrency version; stores bump it on every save.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Quantity of `product_id` on this basket, if any.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<Quantity> {
        self.items
            .iter()
            .find(|item| item.product_id == *product_id)
            .map(|item| item.quantity)
    }

    /// IDs of every product on this basket, in line order.
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.items.iter().map(|item| item.product_id)
    }

    /// The same basket one version later. Called by stores after a successful
    /// compare-and-swap.
    #[must_use]
    pub fn committed(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Sum of unit price times quantity over all lines, before any discount.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::ProductNotFound` for the first line whose product
    /// does not resolve, or `BasketError::AmountOverflow`.
    pub fn compute_total<C>(&self, catalog: &C) -> Result<Price, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        self.items.iter().try_fold(Price::ZERO, |acc, item| {
            let line = item.line_total(catalog)?;
            acc.checked_add(line).ok_or(BasketError::AmountOverflow)
        })
    }

    /// The total a customer is shown right now.
    ///
    /// Open baskets are repriced from the catalog; a finalized basket keeps
    /// the total locked in at checkout.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_total`] for open baskets.
    pub fn current_total<C>(&self, catalog: &C) -> Result<Price, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.status.is_finalized() {
            return Ok(self.total);
        }
        Ok(self.compute_total(catalog)?.saturating_sub(self.discount))
    }

    /// Set the quantity of `product_id`, replacing any existing quantity.
    ///
    /// # Errors
    ///
    /// - `BasketError::ProductNotFound` if the product (or any other line's
    ///   product) does not resolve
    /// - `BasketError::Finalized` if the basket is finalized under
    ///   [`FinalizedPolicy::Locked`]
    pub fn add_or_update<C>(
        &self,
        catalog: &C,
        rules: &BasketRules,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        if catalog.product(&product_id).is_none() {
            return Err(BasketError::ProductNotFound(product_id));
        }

        let mut next = self.editable(rules.finalized)?;
        match next
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => item.quantity = quantity,
            None => next.items.push(LineItem {
                product_id,
                quantity,
            }),
        }
        next.recompute(catalog)
    }

    /// Drop the line for `product_id`.
    ///
    /// Removing a product that is not on the basket returns an identical
    /// basket, whatever the basket's status.
    ///
    /// # Errors
    ///
    /// - `BasketError::ProductNotFound` if a remaining line does not resolve
    /// - `BasketError::Finalized` under [`FinalizedPolicy::Locked`]
    pub fn remove<C>(
        &self,
        catalog: &C,
        rules: &BasketRules,
        product_id: ProductId,
    ) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.quantity_of(&product_id).is_none() {
            return Ok(self.clone());
        }

        let mut next = self.editable(rules.finalized)?;
        next.items.retain(|item| item.product_id != product_id);
        next.recompute(catalog)
    }

    /// Price `code` against the current lines without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_total`].
    pub fn preview_discount<C>(
        &self,
        catalog: &C,
        rules: &BasketRules,
        code: Option<&str>,
    ) -> Result<DiscountPreview, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        let subtotal = self.compute_total(catalog)?;
        let (discount, total) = rules.discounts.discounted_total(subtotal, code);
        Ok(DiscountPreview {
            subtotal,
            discount,
            total,
            recognized: code.is_some_and(|code| rules.discounts.is_recognized(code)),
        })
    }

    /// Recompute the total, apply `code`, gate `payment_method` and finalize.
    ///
    /// # Errors
    ///
    /// - `BasketError::PaymentMethodRejected` if the gate refuses the method;
    ///   nothing is committed
    /// - `BasketError::Finalized` if already finalized under
    ///   [`FinalizedPolicy::Locked`]
    /// - Same as [`Self::compute_total`]
    pub fn checkout<C>(
        &self,
        catalog: &C,
        rules: &BasketRules,
        code: Option<&str>,
        payment_method: PaymentMethod,
    ) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.status.is_finalized() && rules.finalized == FinalizedPolicy::Locked {
            return Err(BasketError::Finalized);
        }

        let subtotal = self.compute_total(catalog)?;
        let (discount, total) = rules.discounts.discounted_total(subtotal, code);
        rules.gate.check(total, &payment_method)?;

        Ok(Self {
            total,
            discount,
            payment_method: Some(payment_method),
            status: BasketStatus::Finalized,
            ..self.clone()
        })
    }

    /// Dispatch a [`BasketCommand`].
    ///
    /// # Errors
    ///
    /// Whatever the dispatched operation returns.
    pub fn apply<C>(
        &self,
        catalog: &C,
        rules: &BasketRules,
        command: BasketCommand,
    ) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        match command {
            BasketCommand::AddOrUpdate {
                product_id,
                quantity,
            } => self.add_or_update(catalog, rules, product_id, quantity),
            BasketCommand::Remove { product_id } => self.remove(catalog, rules, product_id),
            BasketCommand::Checkout {
                discount_code,
                payment_method,
            } => self.checkout(catalog, rules, discount_code.as_deref(), payment_method),
        }
    }

    /// A copy of this basket that may be edited under `policy`.
    fn editable(&self, policy: FinalizedPolicy) -> Result<Self, BasketError> {
        if !self.status.is_finalized() {
            return Ok(self.clone());
        }
        match policy {
            FinalizedPolicy::Locked => Err(BasketError::Finalized),
            FinalizedPolicy::Reopen => Ok(Self {
                discount: Price::ZERO,
                payment_method: None,
                status: BasketStatus::Open,
                ..self.clone()
            }),
        }
    }

    fn recompute<C>(mut self, catalog: &C) -> Result<Self, BasketError>
    where
        C: CatalogLookup + ?Sized,
    {
        self.total = self.compute_total(catalog)?.saturating_sub(self.discount);
        Ok(self)
    }
}
