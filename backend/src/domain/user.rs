//! Landing page user model.
//!
//! Users are created by the public registration workflow and never deleted.
//! Names and email addresses are validated and normalised here so adapters
//! only ever see well-formed values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::SubscriptionStatus;

/// Minimum number of characters in a registered name.
pub const USER_NAME_MIN: usize = 2;
/// Maximum number of characters in a registered name.
pub const USER_NAME_MAX: usize = 100;
/// Longest email address accepted, per RFC 5321 path limits.
pub const EMAIL_MAX: usize = 254;
/// Source recorded for users created through the public sign-up form.
pub const LANDING_PAGE_SOURCE: &str = "landing_page";

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was not a UUID.
    InvalidId,
    /// Name shorter than [`USER_NAME_MIN`] once trimmed.
    NameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Name longer than [`USER_NAME_MAX`] once trimmed.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email missing or blank.
    EmptyEmail,
    /// Email is not a syntactically valid address.
    InvalidEmail,
    /// Status string is not a known status.
    UnknownStatus,
}

impl UserValidationError {
    /// Stable machine-readable code used in field error lists.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::NameTooShort { .. } | Self::NameTooLong { .. } => "invalid_length",
            Self::EmptyEmail => "required",
            Self::InvalidEmail => "invalid_email",
            Self::UnknownStatus => "invalid_status",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::UnknownStatus => write!(f, "status must be active, inactive or banned"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }
}

/// Display name supplied at registration, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a raw name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::NameTooShort {
                min: USER_NAME_MIN,
            });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Surrounding whitespace is removed and the address is lower-cased, so two
///   spellings of the same mailbox compare equal.
/// - The address passes HTML5 email syntax validation.
///
/// # Examples
/// ```
/// use landing_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Alice@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "alice@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate a raw address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.len() > EMAIL_MAX || !normalised.validate_email() {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account status managed by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal account; the only status counted by public stats.
    Active,
    /// Dormant account.
    Inactive,
    /// Account blocked by staff.
    Banned,
}

impl UserStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "banned" => Ok(Self::Banned),
            _ => Err(UserValidationError::UnknownStatus),
        }
    }
}

/// Client metadata captured at the HTTP boundary for the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    /// Peer or forwarded client address.
    pub ip_address: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Trimmed display name.
    pub name: UserName,
    /// Normalised email address.
    pub email: EmailAddress,
    /// Client metadata for the audit log.
    pub origin: RequestOrigin,
}

/// User row produced by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Identifier assigned by the store.
    pub id: UserId,
    /// Name as stored.
    pub name: String,
    /// Email as stored.
    pub email: String,
    /// Creation timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Row of the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account status.
    pub status: UserStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Status of the latest subscription, when one exists.
    pub subscription_status: Option<SubscriptionStatus>,
    /// Confirmation time of the latest subscription.
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A", UserValidationError::NameTooShort { min: USER_NAME_MIN })]
    #[case("   B   ", UserValidationError::NameTooShort { min: USER_NAME_MIN })]
    #[case("", UserValidationError::NameTooShort { min: USER_NAME_MIN })]
    fn rejects_short_names(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserName::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_long_names() {
        let raw = "x".repeat(USER_NAME_MAX + 1);
        assert_eq!(
            UserName::new(raw),
            Err(UserValidationError::NameTooLong { max: USER_NAME_MAX })
        );
    }

    #[rstest]
    #[case("  Alice  ", "Alice")]
    #[case("李小龍", "李小龍")]
    fn trims_names(#[case] raw: &str, #[case] expected: &str) {
        let name = UserName::new(raw).expect("valid name");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    fn counts_characters_not_bytes() {
        let raw = "龍".repeat(USER_NAME_MAX);
        assert!(UserName::new(raw).is_ok());
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::InvalidEmail)]
    #[case("a@", UserValidationError::InvalidEmail)]
    fn rejects_bad_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    fn normalises_email_case_and_whitespace() {
        let first = EmailAddress::new(" Alice@Example.com").expect("valid");
        let second = EmailAddress::new("alice@example.COM ").expect("valid");
        assert_eq!(first, second);
        assert_eq!(first.as_ref(), "alice@example.com");
    }

    #[rstest]
    #[case("active", UserStatus::Active)]
    #[case("inactive", UserStatus::Inactive)]
    #[case("banned", UserStatus::Banned)]
    fn status_round_trips_storage_form(#[case] raw: &str, #[case] status: UserStatus) {
        assert_eq!(raw.parse::<UserStatus>(), Ok(status));
        assert_eq!(status.as_str(), raw);
    }

    #[rstest]
    fn status_rejects_unknown_values() {
        assert_eq!(
            "deleted".parse::<UserStatus>(),
            Err(UserValidationError::UnknownStatus)
        );
    }

    #[rstest]
    fn user_id_rejects_non_uuid() {
        assert_eq!("123".parse::<UserId>(), Err(UserValidationError::InvalidId));
    }
}
