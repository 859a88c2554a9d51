//! Driving ports for admin reporting and public counters.

use async_trait::async_trait;

use crate::domain::{AdminStats, Error, PublicStats, StatsPeriod, UserListFilter, UserPage};

/// Domain use-case port behind the admin listing and dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryQuery: Send + Sync {
    /// One page of users matching `filter`.
    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, Error>;

    /// Overview and daily trend for `period`.
    async fn admin_stats(&self, period: StatsPeriod) -> Result<AdminStats, Error>;
}

/// Domain use-case port behind the unauthenticated counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicStatsQuery: Send + Sync {
    /// Counts over active users.
    async fn public_stats(&self) -> Result<PublicStats, Error>;
}
