//! Driven port for the welcome email sent after registration.

use async_trait::async_trait;

use crate::domain::{EmailAddress, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum WelcomeMailerError {
        /// The message could not be built or handed to the relay.
        Delivery { message: String } => "welcome email delivery failed: {message}",
    }
}

/// Relay acknowledgement for a dispatched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// `Message-ID` header of the dispatched message.
    pub message_id: String,
}

/// Port for sending the templated welcome email.
///
/// Adapters make one attempt; retries are not part of the contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    /// Send the welcome email to `email`, greeting `name`.
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        name: &UserName,
    ) -> Result<DeliveryReceipt, WelcomeMailerError>;
}
