//! Driven port for the registration workflow's persistence.
//!
//! The create operation is atomic: the user row, its pending subscription and
//! the `user_registered` audit entry are written together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, RegisteredUser, Registration, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by registration repository adapters.
    pub enum RegistrationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "registration repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "registration repository query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail { email: String } =>
            "email address already registered: {email}",
    }
}

/// Port for storing new sign-ups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Report whether a user with this email already exists.
    async fn email_exists(&self, email: &EmailAddress)
    -> Result<bool, RegistrationRepositoryError>;

    /// Insert the user, a pending `free_book` subscription and the audit
    /// entry in one transaction.
    ///
    /// A unique violation on the email column is reported as
    /// [`RegistrationRepositoryError::DuplicateEmail`].
    async fn create_registration(
        &self,
        registration: &Registration,
    ) -> Result<RegisteredUser, RegistrationRepositoryError>;

    /// Mark the user's subscriptions confirmed at `confirmed_at`.
    async fn confirm_subscription(
        &self,
        user_id: &UserId,
        confirmed_at: DateTime<Utc>,
    ) -> Result<(), RegistrationRepositoryError>;
}
