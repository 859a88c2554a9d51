//! Driven port for signing and verifying admin session tokens.

use crate::domain::SessionClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session token adapters.
    pub enum SessionTokenError {
        /// Signing the claims failed.
        Signing { message: String } => "session token signing failed: {message}",
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "session token is invalid: {message}",
    }
}

/// Port for stateless session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Sign `claims` into a bearer token.
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError>;

    /// Verify the signature of `token` and return its claims.
    ///
    /// Expiry is left to the caller, which compares `exp` with its own clock.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}
