//! Registration workflow.
//!
//! The workflow runs in two phases. The durable phase stores the user, a
//! pending subscription and the audit entry atomically. The best-effort phase
//! sends the welcome email and, on success, confirms the subscription. Failures
//! in the second phase are logged and never reach the caller, so a stored user
//! may keep a pending subscription indefinitely.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    RegistrationRepository, RegistrationRepositoryError, UserRegistration, WelcomeMailer,
};
use crate::domain::{Error, RegisteredUser, Registration};

/// Message returned when an email address is already registered.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "this email address is already registered";

/// Registration service implementing [`UserRegistration`].
#[derive(Clone)]
pub struct RegistrationService<R, M: ?Sized> {
    repository: Arc<R>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<R, M: ?Sized> RegistrationService<R, M> {
    /// Create a new service with the given adapters.
    pub fn new(repository: Arc<R>, mailer: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            mailer,
            clock,
        }
    }
}

impl<R, M: ?Sized> RegistrationService<R, M>
where
    R: RegistrationRepository,
    M: WelcomeMailer,
{
    fn map_repository_error(error: RegistrationRepositoryError) -> Error {
        match error {
            RegistrationRepositoryError::Connection { message } => {
                Error::internal(format!("registration store unavailable: {message}"))
            }
            RegistrationRepositoryError::Query { message } => {
                Error::internal(format!("registration store error: {message}"))
            }
            RegistrationRepositoryError::DuplicateEmail { .. } => {
                Error::conflict(DUPLICATE_EMAIL_MESSAGE)
            }
        }
    }

    async fn deliver_welcome(&self, registration: &Registration, user: &RegisteredUser) {
        let receipt = match self
            .mailer
            .send_welcome(&registration.email, &registration.name)
            .await
        {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(user_id = %user.id, %error, "welcome email failed; subscription left pending");
                return;
            }
        };
        info!(user_id = %user.id, message_id = %receipt.message_id, "welcome email sent");

        if let Err(error) = self
            .repository
            .confirm_subscription(&user.id, self.clock.utc())
            .await
        {
            warn!(user_id = %user.id, %error, "subscription confirmation failed");
        }
    }
}

#[async_trait]
impl<R, M: ?Sized> UserRegistration for RegistrationService<R, M>
where
    R: RegistrationRepository,
    M: WelcomeMailer,
{
    async fn register(&self, registration: Registration) -> Result<RegisteredUser, Error> {
        let exists = self
            .repository
            .email_exists(&registration.email)
            .await
            .map_err(Self::map_repository_error)?;
        if exists {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        let user = self
            .repository
            .create_registration(&registration)
            .await
            .map_err(Self::map_repository_error)?;

        self.deliver_welcome(&registration, &user).await;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
