//! Driven port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum CredentialHasherError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Port for producing and checking password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError>;

    /// Check `password` against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only unusable hashes are errors.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError>;
}
