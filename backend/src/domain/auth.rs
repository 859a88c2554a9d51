//! Authentication primitives for the admin panel.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::AdminId;

/// Shortest password accepted by the login form.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

impl LoginValidationError {
    /// Request field the problem refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable code used in field error lists.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "required",
            Self::PasswordTooShort { .. } => "invalid_length",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated admin login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` has at least [`PASSWORD_MIN`] characters and retains
///   caller-provided whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use landing_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "admin123").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "admin123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// Every problem is reported, not just the first.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, Vec<LoginValidationError>> {
        let normalized = username.trim();
        let mut problems = Vec::new();
        if normalized.is_empty() {
            problems.push(LoginValidationError::EmptyUsername);
        }
        if password.chars().count() < PASSWORD_MIN {
            problems.push(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for admin lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Claims carried by an admin session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin identifier.
    pub sub: AdminId,
    /// Admin username at issue time.
    pub username: String,
    /// Admin role at issue time.
    pub role: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Public view of an admin returned after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProfile {
    /// Admin identifier.
    pub id: AdminId,
    /// Login name.
    pub username: String,
    /// Role name.
    pub role: String,
    /// Login time recorded before the current one, if any.
    pub last_login: Option<DateTime<Utc>>,
}

/// Outcome of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLogin {
    /// Signed bearer token.
    pub token: String,
    /// Profile of the authenticated admin.
    pub admin: AdminProfile,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "password", vec![LoginValidationError::EmptyUsername])]
    #[case("   ", "password", vec![LoginValidationError::EmptyUsername])]
    #[case("admin", "12345", vec![LoginValidationError::PasswordTooShort { min: PASSWORD_MIN }])]
    #[case(
        "",
        "",
        vec![
            LoginValidationError::EmptyUsername,
            LoginValidationError::PasswordTooShort { min: PASSWORD_MIN },
        ]
    )]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Vec<LoginValidationError>,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("admin", " pass  ").expect("valid");
        assert_eq!(creds.password(), " pass  ");
    }
}
