//! Admin listing, dashboard statistics and public counters.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Pagination;

use crate::domain::ports::{
    PublicStatsQuery, UserDirectoryQuery, UserDirectoryRepository, UserDirectoryRepositoryError,
};
use crate::domain::{
    AdminStats, Error, PublicStats, StatsPeriod, StatsWindows, UserListFilter, UserPage,
};

/// Read-side service over the user table.
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserDirectoryService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    fn map_repository_error(error: UserDirectoryRepositoryError) -> Error {
        match error {
            UserDirectoryRepositoryError::Connection { message } => {
                Error::internal(format!("user directory unavailable: {message}"))
            }
            UserDirectoryRepositoryError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<R> UserDirectoryQuery for UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, Error> {
        let users = self
            .repository
            .list_users(&filter)
            .await
            .map_err(Self::map_repository_error)?;
        let total = self
            .repository
            .count_users(&filter)
            .await
            .map_err(Self::map_repository_error)?;

        Ok(UserPage {
            users,
            pagination: Pagination::for_request(filter.page, total),
        })
    }

    async fn admin_stats(&self, period: StatsPeriod) -> Result<AdminStats, Error> {
        let windows = StatsWindows::resolve(self.clock.utc(), period);
        let overview = self
            .repository
            .admin_overview(&windows)
            .await
            .map_err(Self::map_repository_error)?;
        let trends = self
            .repository
            .daily_registrations(windows.period_start)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(AdminStats { overview, trends })
    }
}

#[async_trait]
impl<R> PublicStatsQuery for UserDirectoryService<R>
where
    R: UserDirectoryRepository,
{
    async fn public_stats(&self) -> Result<PublicStats, Error> {
        let windows = StatsWindows::resolve(self.clock.utc(), StatsPeriod::default());
        self.repository
            .public_stats(&windows)
            .await
            .map_err(Self::map_repository_error)
    }
}
