//! Admin login and bearer-token verification.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AdminRepository, AdminRepositoryError, AdminSession, CredentialHasher, SessionTokenError,
    SessionTokens,
};
use crate::domain::{Admin, AdminLogin, AdminProfile, Error, LoginCredentials, SessionClaims};

/// Message returned for any credential mismatch.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";

/// Admin session service implementing [`AdminSession`].
#[derive(Clone)]
pub struct AdminSessionService<A, H, T> {
    admins: Arc<A>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    token_lifetime: Duration,
}

impl<A, H, T> AdminSessionService<A, H, T> {
    /// Create a new service; tokens expire `token_lifetime` after issue.
    pub fn new(
        admins: Arc<A>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            admins,
            hasher,
            tokens,
            clock,
            token_lifetime,
        }
    }
}

impl<A, H, T> AdminSessionService<A, H, T>
where
    A: AdminRepository,
    H: CredentialHasher,
    T: SessionTokens,
{
    fn map_repository_error(error: AdminRepositoryError) -> Error {
        match error {
            AdminRepositoryError::Connection { message } => {
                Error::internal(format!("admin store unavailable: {message}"))
            }
            AdminRepositoryError::Query { message } => {
                Error::internal(format!("admin store error: {message}"))
            }
        }
    }

    fn password_matches(&self, admin: &Admin, credentials: &LoginCredentials) -> bool {
        match self
            .hasher
            .verify(credentials.password(), &admin.password_hash)
        {
            Ok(matches) => matches,
            Err(error) => {
                warn!(admin_id = %admin.id, %error, "stored password hash rejected");
                false
            }
        }
    }

    fn issue_token(&self, admin: &Admin) -> Result<String, Error> {
        let issued_at = self.clock.utc();
        let claims = SessionClaims {
            sub: admin.id,
            username: admin.username.clone(),
            role: admin.role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.token_lifetime).timestamp(),
        };
        self.tokens
            .issue(&claims)
            .map_err(|err| Error::internal(format!("failed to issue session token: {err}")))
    }
}

#[async_trait]
impl<A, H, T> AdminSession for AdminSessionService<A, H, T>
where
    A: AdminRepository,
    H: CredentialHasher,
    T: SessionTokens,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminLogin, Error> {
        let admin = self
            .admins
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_repository_error)?;

        let Some(admin) = admin.filter(|admin| self.password_matches(admin, credentials)) else {
            info!(username = credentials.username(), "admin login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let token = self.issue_token(&admin)?;
        self.admins
            .record_login(&admin.id, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)?;

        info!(admin_id = %admin.id, username = %admin.username, "admin logged in");
        Ok(AdminLogin {
            token,
            admin: AdminProfile {
                id: admin.id,
                username: admin.username,
                role: admin.role,
                last_login: admin.last_login,
            },
        })
    }

    fn authenticate(&self, token: &str) -> Result<SessionClaims, Error> {
        let claims = self.tokens.verify(token).map_err(|err| match err {
            SessionTokenError::Invalid { .. } | SessionTokenError::Signing { .. } => {
                Error::forbidden("invalid session token")
            }
        })?;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(Error::forbidden("session token has expired"));
        }
        Ok(claims)
    }
}
