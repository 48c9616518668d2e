//! Payment method labels.
//!
//! A payment method is a label recorded on a finalized basket, not a charged
//! transaction. Two labels are known to the checkout gate; everything else is
//! carried through verbatim.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PaymentMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodError {
    /// The label is empty or only whitespace.
    #[error("payment method cannot be empty")]
    Empty,
}

/// How a customer pays for a finalized basket.
///
/// Labels match exactly (case-sensitive): `"Cash"` and `"Credit Card"` are
/// recognized, any other non-empty label is kept as [`PaymentMethod::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Other(String),
}

impl PaymentMethod {
    /// Label for cash payments.
    pub const CASH_LABEL: &'static str = "Cash";
    /// Label for credit card payments.
    pub const CREDIT_CARD_LABEL: &'static str = "Credit Card";

    /// Parse a payment method label.
    ///
    /// # Errors
    ///
    /// Returns `PaymentMethodError::Empty` if the label is blank.
    pub fn parse(label: &str) -> Result<Self, PaymentMethodError> {
        if label.trim().is_empty() {
            return Err(PaymentMethodError::Empty);
        }
        match label {
            Self::CASH_LABEL => Ok(Self::Cash),
            Self::CREDIT_CARD_LABEL => Ok(Self::CreditCard),
            other => Ok(Self::Other(other.to_owned())),
        }
    }

    /// The label as recorded on the basket.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => Self::CASH_LABEL,
            Self::CreditCard => Self::CREDIT_CARD_LABEL,
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = PaymentMethodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}
