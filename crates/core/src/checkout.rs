//! Checkout gate and finalized-basket policy.

use core::fmt;

use crate::error::BasketError;
use crate::types::{PaymentMethod, Price};

/// Payment-method rule applied at checkout.
///
/// A total strictly above `threshold` cannot be paid with `restricted`.
/// The defaults are 10.00 and cash: 10.00 in cash is accepted, 10.01 is not,
/// and any other method is accepted for any total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutGate {
    pub threshold: Price,
    pub restricted: PaymentMethod,
}

impl CheckoutGate {
    /// Check a post-discount total against the gate.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::PaymentMethodRejected` when `method` is the
    /// restricted method and `total` exceeds the threshold.
    pub fn check(&self, total: Price, method: &PaymentMethod) -> Result<(), BasketError> {
        if total > self.threshold && *method == self.restricted {
            return Err(BasketError::PaymentMethodRejected {
                total,
                threshold: self.threshold,
                method: method.clone(),
            });
        }
        Ok(())
    }
}

impl Default for CheckoutGate {
    fn default() -> Self {
        Self {
            threshold: Price::from_units(10),
            restricted: PaymentMethod::Cash,
        }
    }
}

/// What happens when a finalized basket is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalizedPolicy {
    /// Changes are allowed and reopen the basket: status goes back to open,
    /// the recorded discount and payment method are cleared.
    #[default]
    Reopen,
    /// Changes and repeated checkouts are rejected with
    /// [`BasketError::Finalized`].
    Locked,
}

impl fmt::Display for FinalizedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reopen => write!(f, "reopen"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

impl std::str::FromStr for FinalizedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reopen" => Ok(Self::Reopen),
            "locked" => Ok(Self::Locked),
            _ => Err(format!("invalid finalized basket policy: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_at_threshold_is_accepted() {
        let gate = CheckoutGate::default();
        assert!(gate.check(Price::from_units(10), &PaymentMethod::Cash).is_ok());
    }

    #[test]
    fn test_padded_cash_label_is_not_restricted() {
        let gate = CheckoutGate::default();
        let method = PaymentMethod::parse(" Cash ").unwrap();
        assert!(gate.check(Price::from_units(14), &method).is_ok());
    }

    #[test]
    fn test_cash_over_threshold_is_rejected() {
        let gate = CheckoutGate::default();
        let err = gate
            .check(Price::from_cents(1001), &PaymentMethod::Cash)
            .unwrap_err();
        assert!(matches!(err, BasketError::PaymentMethodRejected { .. }));
    }

    #[test]
    fn test_other_methods_always_accepted() {
        let gate = CheckoutGate::default();
        let big = Price::from_units(1_000_000);
        assert!(gate.check(big, &PaymentMethod::CreditCard).is_ok());
        assert!(
            gate.check(big, &PaymentMethod::Other("cash".to_string()))
                .is_ok()
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reopen".parse::<FinalizedPolicy>(), Ok(FinalizedPolicy::Reopen));
        assert_eq!(" LOCKED ".parse::<FinalizedPolicy>(), Ok(FinalizedPolicy::Locked));
        assert!("sometimes".parse::<FinalizedPolicy>().is_err());
    }
}
