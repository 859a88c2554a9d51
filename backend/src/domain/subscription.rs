//! Subscription state attached to each registered user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription kind granted by the landing page offer.
pub const FREE_BOOK_SUBSCRIPTION: &str = "free_book";

/// Delivery state of a subscription.
///
/// Subscriptions start `Pending` inside the registration transaction and move
/// to `Confirmed` once the welcome email has been handed to the mail relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created, welcome email not yet confirmed.
    Pending,
    /// Welcome email dispatched.
    Confirmed,
}

impl SubscriptionStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored subscription status is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subscription status: {0}")]
pub struct UnknownSubscriptionStatus(pub String);

impl FromStr for SubscriptionStatus {
    type Err = UnknownSubscriptionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(UnknownSubscriptionStatus(other.to_owned())),
        }
    }
}
