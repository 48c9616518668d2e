//! Discount codes.
//!
//! A closed table mapping discount codes to rules. The default table knows a
//! single code, [`DISCOUNT10`], worth a flat 2.00 off the basket total. Any
//! other code, including an empty or missing one, is worth nothing.
//!
//! This is deliberately not a pricing-rule engine: rules do not compose, look
//! at basket contents, or target individual items. New codes are added by
//! building a [`DiscountPolicy`] with more entries.

use std::collections::HashMap;

use crate::types::Price;

/// The one code recognized by the default policy.
pub const DISCOUNT10: &str = "DISCOUNT10";

/// What a recognized code is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// A fixed amount off the basket total.
    Flat(Price),
}

impl DiscountRule {
    /// The discount amount this rule grants.
    #[must_use]
    pub const fn amount(&self) -> Price {
        match self {
            Self::Flat(amount) => *amount,
        }
    }
}

/// Lookup table from discount code to rule.
///
/// Codes match exactly (case-sensitive, no trimming).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountPolicy {
    rules: HashMap<String, DiscountRule>,
}

impl DiscountPolicy {
    /// Build a policy from `(code, rule)` entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DiscountRule)>,
        S: Into<String>,
    {
        Self {
            rules: entries
                .into_iter()
                .map(|(code, rule)| (code.into(), rule))
                .collect(),
        }
    }

    /// Discount amount granted by `code`; zero for unknown or missing codes.
    #[must_use]
    pub fn apply(&self, code: Option<&str>) -> Price {
        code.and_then(|code| self.rules.get(code))
            .map_or(Price::ZERO, DiscountRule::amount)
    }

    /// Returns `true` if `code` is in the table.
    #[must_use]
    pub fn is_recognized(&self, code: &str) -> bool {
        self.rules.contains_key(code)
    }

    /// Take the discount for `code` off `subtotal`, flooring at zero.
    ///
    /// Returns `(discount, total)`. The discount is the full rule amount even
    /// when it exceeds the subtotal.
    #[must_use]
    pub fn discounted_total(&self, subtotal: Price, code: Option<&str>) -> (Price, Price) {
        let discount = self.apply(code);
        (discount, subtotal.saturating_sub(discount))
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::new([(DISCOUNT10, DiscountRule::Flat(Price::from_units(2)))])
    }
}
