//! Driven port for admin account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Admin, AdminId, NewAdmin};

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "admin repository query failed: {message}",
    }
}

/// Port for reading and updating admin accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Fetch an admin by exact username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<Admin>, AdminRepositoryError>;

    /// Record a successful login.
    async fn record_login(
        &self,
        id: &AdminId,
        at: DateTime<Utc>,
    ) -> Result<(), AdminRepositoryError>;

    /// Insert `admin` unless the username is taken.
    ///
    /// Returns `true` when a row was created.
    async fn create_if_absent(&self, admin: &NewAdmin) -> Result<bool, AdminRepositoryError>;
}
