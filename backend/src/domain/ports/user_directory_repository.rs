//! Driven port for read-only queries over the user table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AdminStatsOverview, DailyRegistrations, PublicStats, StatsWindows, UserListFilter, UserSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Port for listing users and aggregating registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryRepository: Send + Sync {
    /// Users matching `filter` on the requested page, newest first, each
    /// with its latest subscription.
    async fn list_users(
        &self,
        filter: &UserListFilter,
    ) -> Result<Vec<UserSummary>, UserDirectoryRepositoryError>;

    /// Number of users matching `filter` across all pages.
    async fn count_users(&self, filter: &UserListFilter)
    -> Result<u64, UserDirectoryRepositoryError>;

    /// Aggregate counts over all users.
    async fn admin_overview(
        &self,
        windows: &StatsWindows,
    ) -> Result<AdminStatsOverview, UserDirectoryRepositoryError>;

    /// Registrations per UTC day since `since`, ascending, zero days absent.
    async fn daily_registrations(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyRegistrations>, UserDirectoryRepositoryError>;

    /// Aggregate counts over active users.
    async fn public_stats(
        &self,
        windows: &StatsWindows,
    ) -> Result<PublicStats, UserDirectoryRepositoryError>;
}
