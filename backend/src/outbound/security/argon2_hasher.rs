//! Argon2id implementation of the credential hasher port.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Hashes admin passwords into PHC strings with Argon2id defaults.
#[derive(Debug, Default, Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Create a hasher using the crate's recommended parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
        }
    }
}
