//! Driving port for admin authentication.
//!
//! Inbound adapters call this port to log admins in and to check bearer
//! tokens on protected routes without touching persistence or key material.

use async_trait::async_trait;

use crate::domain::{AdminLogin, Error, LoginCredentials, SessionClaims};

/// Domain use-case port for admin sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminSession: Send + Sync {
    /// Check credentials and issue a session token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminLogin, Error>;

    /// Verify a bearer token and return its claims.
    fn authenticate(&self, token: &str) -> Result<SessionClaims, Error>;
}
