//! Admin accounts used to access the reporting panel.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to the seeded administrator.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Stable admin identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(Uuid);

impl AdminId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Stored admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    /// Account identifier.
    pub id: AdminId,
    /// Unique login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Role name, for example [`SUPER_ADMIN_ROLE`].
    pub role: String,
    /// Time of the last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Admin account to be created by the seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    /// Unique login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Role name.
    pub role: String,
}
