//! Basket status.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a basket.
///
/// A basket starts `Open`. Checkout moves it to `Finalized`, recording the
/// payment method and locking the total for that transaction. Whether a
/// finalized basket may be edited again is decided by
/// [`FinalizedPolicy`](crate::FinalizedPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.basket_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum BasketStatus {
    /// Accepting mutations.
    #[default]
    Open,
    /// Checked out with a payment method.
    Finalized,
}

impl BasketStatus {
    /// Returns `true` for [`BasketStatus::Finalized`].
    #[must_use]
    pub const fn is_finalized(self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl std::fmt::Display for BasketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

impl std::str::FromStr for BasketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "finalized" => Ok(Self::Finalized),
            _ => Err(format!("invalid basket status: {s}")),
        }
    }
}
