//! PostgreSQL-backed registration adapter.
//!
//! This adapter implements the `RegistrationRepository` port. The user row,
//! its pending subscription and the `user_registered` audit entry are written
//! in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde_json::json;

use crate::domain::ports::{RegistrationRepository, RegistrationRepositoryError};
use crate::domain::{
    EmailAddress, FREE_BOOK_SUBSCRIPTION, LANDING_PAGE_SOURCE, RegisteredUser, Registration,
    SubscriptionStatus, UserId, UserStatus,
};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewSubscriptionRow, NewSystemLogRow, NewUserRow, RegisteredUserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, system_logs, users};

/// Audit action recorded for every sign-up.
pub const USER_REGISTERED_ACTION: &str = "user_registered";

const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the registration repository.
#[derive(Clone)]
pub struct DieselRegistrationRepository {
    pool: DbPool,
}

impl DieselRegistrationRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use landing_backend::outbound::persistence::{
    ///     DbPool, DieselRegistrationRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselRegistrationRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures raised inside the registration transaction.
#[derive(Debug, thiserror::Error)]
enum WriteError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
}

impl WriteError {
    fn into_port_error(self, email: &EmailAddress) -> RegistrationRepositoryError {
        match self {
            Self::Pool(error) => map_pool_error(error, RegistrationRepositoryError::connection),
            Self::Diesel(error) if is_unique_violation(&error, USERS_EMAIL_CONSTRAINT) => {
                RegistrationRepositoryError::duplicate_email(email.as_ref())
            }
            Self::Diesel(error) => map_registration_diesel_error(error),
        }
    }
}

fn map_registration_pool_error(error: PoolError) -> RegistrationRepositoryError {
    map_pool_error(error, RegistrationRepositoryError::connection)
}

fn map_registration_diesel_error(error: diesel::result::Error) -> RegistrationRepositoryError {
    map_diesel_error(
        error,
        RegistrationRepositoryError::query,
        RegistrationRepositoryError::connection,
    )
}

impl From<RegisteredUserRow> for RegisteredUser {
    fn from(row: RegisteredUserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            registered_at: row.created_at,
        }
    }
}

#[async_trait]
impl RegistrationRepository for DieselRegistrationRepository {
    async fn email_exists(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, RegistrationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_registration_pool_error)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::email.eq(email.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_registration_diesel_error)
    }

    async fn create_registration(
        &self,
        registration: &Registration,
    ) -> Result<RegisteredUser, RegistrationRepositoryError> {
        let name = registration.name.as_ref();
        let email = registration.email.as_ref();
        let ip_address = registration.origin.ip_address.as_deref();
        let user_agent = registration.origin.user_agent.as_deref();
        let details = json!({ "name": name, "email": email });

        let row = self
            .pool
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    let user = diesel::insert_into(users::table)
                        .values(&NewUserRow {
                            name,
                            email,
                            status: UserStatus::Active.as_str(),
                            source: LANDING_PAGE_SOURCE,
                        })
                        .returning(RegisteredUserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(subscriptions::table)
                        .values(&NewSubscriptionRow {
                            user_id: user.id,
                            subscription_type: FREE_BOOK_SUBSCRIPTION,
                            status: SubscriptionStatus::Pending.as_str(),
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(system_logs::table)
                        .values(&NewSystemLogRow {
                            action: USER_REGISTERED_ACTION,
                            user_id: Some(user.id),
                            details,
                            ip_address,
                            user_agent,
                        })
                        .execute(conn)
                        .await?;

                    Ok(user)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| err.into_port_error(&registration.email))?;

        Ok(row.into())
    }

    async fn confirm_subscription(
        &self,
        user_id: &UserId,
        confirmed_at: DateTime<Utc>,
    ) -> Result<(), RegistrationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_registration_pool_error)?;
        diesel::update(subscriptions::table.filter(subscriptions::user_id.eq(user_id.as_uuid())))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Confirmed.as_str()),
                subscriptions::confirmed_at.eq(Some(confirmed_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_registration_diesel_error)?;
        Ok(())
    }
}
