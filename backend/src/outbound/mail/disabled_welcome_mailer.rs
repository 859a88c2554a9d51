//! Mailer used when no SMTP relay is configured.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{DeliveryReceipt, WelcomeMailer, WelcomeMailerError};
use crate::domain::{EmailAddress, UserName};

/// Delivery error message reported by [`DisabledWelcomeMailer`].
pub const SMTP_NOT_CONFIGURED: &str = "smtp not configured";

/// Rejects every message so subscriptions stay pending.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledWelcomeMailer;

#[async_trait]
impl WelcomeMailer for DisabledWelcomeMailer {
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        _name: &UserName,
    ) -> Result<DeliveryReceipt, WelcomeMailerError> {
        debug!(email = %email, "welcome email skipped: smtp not configured");
        Err(WelcomeMailerError::delivery(SMTP_NOT_CONFIGURED))
    }
}
