//! Driving port for public sign-ups.

use async_trait::async_trait;

use crate::domain::{Error, RegisteredUser, Registration};

/// Domain use-case port for registering a landing page user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Store the sign-up and send the welcome email.
    ///
    /// Mail failures do not fail the call; the subscription stays pending.
    async fn register(&self, registration: Registration) -> Result<RegisteredUser, Error>;
}
