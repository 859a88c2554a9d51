//! PostgreSQL-backed user directory adapter.
//!
//! The listing filter is translated into a boxed Diesel predicate shared by
//! the page query and the count query, so `pagination.total` always counts
//! the same rows the page is drawn from. Aggregates use parameterised SQL
//! with `COUNT(*) FILTER (...)` clauses.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::PgTextExpressionMethods;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Timestamptz;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserDirectoryRepository, UserDirectoryRepositoryError};
use crate::domain::{
    AdminStatsOverview, DailyRegistrations, PublicStats, StatsWindows, StatusFilter,
    SubscriptionStatus, UserId, UserListFilter, UserSummary,
};

use super::error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{DailyCountRow, OverviewRow, PublicStatsRow, SubscriptionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

const OVERVIEW_SQL: &str = "\
SELECT
    COUNT(*) AS total_users,
    COUNT(*) FILTER (WHERE created_at >= $1) AS users_this_period,
    COUNT(*) FILTER (WHERE created_at >= $2) AS users_this_week,
    COUNT(*) FILTER (WHERE created_at >= $3) AS users_today,
    COUNT(*) FILTER (WHERE status = 'active') AS active_users,
    COUNT(*) FILTER (WHERE status = 'inactive') AS inactive_users,
    COUNT(*) FILTER (WHERE status = 'banned') AS banned_users
FROM users";

const PUBLIC_STATS_SQL: &str = "\
SELECT
    COUNT(*) AS total_users,
    COUNT(*) FILTER (WHERE created_at >= $1) AS users_this_week,
    COUNT(*) FILTER (WHERE created_at >= $2) AS users_today
FROM users
WHERE status = 'active'";

const DAILY_REGISTRATIONS_SQL: &str = "\
SELECT
    (created_at AT TIME ZONE 'UTC')::date AS date,
    COUNT(*) AS count
FROM users
WHERE created_at >= $1
GROUP BY 1
ORDER BY 1";

/// Diesel-backed implementation of the user directory.
#[derive(Clone)]
pub struct DieselUserDirectoryRepository {
    pool: DbPool,
}

impl DieselUserDirectoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_directory_pool_error(error: PoolError) -> UserDirectoryRepositoryError {
    map_pool_error(error, UserDirectoryRepositoryError::connection)
}

fn map_directory_diesel_error(error: diesel::result::Error) -> UserDirectoryRepositoryError {
    map_diesel_error(
        error,
        UserDirectoryRepositoryError::query,
        UserDirectoryRepositoryError::connection,
    )
}

/// Users matching `filter`, without ordering or paging.
fn filtered_users(filter: &UserListFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = term.like_pattern();
        query = query.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    if let StatusFilter::Only(status) = filter.status {
        query = query.filter(users::status.eq(status.as_str()));
    }
    query
}

/// Keep the newest subscription per user; rows arrive newest first.
fn latest_subscriptions(rows: Vec<SubscriptionRow>) -> HashMap<Uuid, SubscriptionRow> {
    let mut latest = HashMap::with_capacity(rows.len());
    for row in rows {
        latest.entry(row.user_id).or_insert(row);
    }
    latest
}

fn to_summary(
    row: UserRow,
    subscription: Option<SubscriptionRow>,
) -> Result<UserSummary, UserDirectoryRepositoryError> {
    let status = row.status.parse().map_err(|_| {
        UserDirectoryRepositoryError::query(format!("unknown user status: {}", row.status))
    })?;
    let (subscription_status, confirmed_at) = match subscription {
        Some(sub) => {
            let parsed = sub
                .status
                .parse::<SubscriptionStatus>()
                .map_err(|err| UserDirectoryRepositoryError::query(err.to_string()))?;
            (Some(parsed), sub.confirmed_at)
        }
        None => (None, None),
    };
    Ok(UserSummary {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
        subscription_status,
        confirmed_at,
    })
}

#[async_trait]
impl UserDirectoryRepository for DieselUserDirectoryRepository {
    async fn list_users(
        &self,
        filter: &UserListFilter,
    ) -> Result<Vec<UserSummary>, UserDirectoryRepositoryError> {
        let limit = i64::from(filter.page.limit());
        let offset = i64::try_from(filter.page.offset())
            .map_err(|_| UserDirectoryRepositoryError::query("page offset exceeds i64 range"))?;

        let mut conn = self.pool.get().await.map_err(map_directory_pool_error)?;
        let rows = filtered_users(filter)
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let subscription_rows = subscriptions::table
            .filter(subscriptions::user_id.eq_any(ids))
            .select(SubscriptionRow::as_select())
            .order((subscriptions::user_id, subscriptions::created_at.desc()))
            .load::<SubscriptionRow>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;
        let mut latest = latest_subscriptions(subscription_rows);

        rows.into_iter()
            .map(|row| {
                let subscription = latest.remove(&row.id);
                to_summary(row, subscription)
            })
            .collect()
    }

    async fn count_users(
        &self,
        filter: &UserListFilter,
    ) -> Result<u64, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_directory_pool_error)?;
        let total = filtered_users(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;
        Ok(to_count(total))
    }

    async fn admin_overview(
        &self,
        windows: &StatsWindows,
    ) -> Result<AdminStatsOverview, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_directory_pool_error)?;
        let row = sql_query(OVERVIEW_SQL)
            .bind::<Timestamptz, _>(windows.period_start)
            .bind::<Timestamptz, _>(windows.week_start)
            .bind::<Timestamptz, _>(windows.today_start)
            .get_result::<OverviewRow>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;
        Ok(AdminStatsOverview {
            total_users: to_count(row.total_users),
            users_this_period: to_count(row.users_this_period),
            users_this_week: to_count(row.users_this_week),
            users_today: to_count(row.users_today),
            active_users: to_count(row.active_users),
            inactive_users: to_count(row.inactive_users),
            banned_users: to_count(row.banned_users),
        })
    }

    async fn daily_registrations(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyRegistrations>, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_directory_pool_error)?;
        let rows = sql_query(DAILY_REGISTRATIONS_SQL)
            .bind::<Timestamptz, _>(since)
            .load::<DailyCountRow>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| DailyRegistrations {
                date: row.date,
                count: to_count(row.count),
            })
            .collect())
    }

    async fn public_stats(
        &self,
        windows: &StatsWindows,
    ) -> Result<PublicStats, UserDirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_directory_pool_error)?;
        let row = sql_query(PUBLIC_STATS_SQL)
            .bind::<Timestamptz, _>(windows.week_start)
            .bind::<Timestamptz, _>(windows.today_start)
            .get_result::<PublicStatsRow>(&mut conn)
            .await
            .map_err(map_directory_diesel_error)?;
        Ok(PublicStats {
            total_users: to_count(row.total_users),
            users_this_week: to_count(row.users_this_week),
            users_today: to_count(row.users_today),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query construction and row mapping.
    use super::*;
    use crate::domain::{SearchTerm, UserStatus};
    use diesel::debug_query;
    use rstest::rstest;

    fn filter(search: &str, status: StatusFilter) -> UserListFilter {
        UserListFilter {
            search: SearchTerm::parse(search).expect("valid search"),
            status,
            ..UserListFilter::default()
        }
    }

    #[rstest]
    fn unfiltered_listing_has_no_where_clause() {
        let query = filtered_users(&UserListFilter::default());
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(!sql.contains("WHERE"), "unexpected predicate in {sql}");
    }

    #[rstest]
    fn search_and_status_are_bound_parameters() {
        let query = filtered_users(&filter("ann%", StatusFilter::Only(UserStatus::Active)));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("ILIKE $1"), "missing name match in {sql}");
        assert!(sql.contains("ILIKE $2"), "missing email match in {sql}");
        assert!(sql.contains("\"status\" = $3"), "missing status match in {sql}");
        assert!(sql.contains("%ann\\\\%%"), "pattern not escaped in {sql}");
    }

    #[rstest]
    fn latest_subscription_wins() {
        let user = Uuid::new_v4();
        let newest = SubscriptionRow {
            user_id: user,
            status: "confirmed".to_owned(),
            confirmed_at: Some(Utc::now()),
        };
        let older = SubscriptionRow {
            user_id: user,
            status: "pending".to_owned(),
            confirmed_at: None,
        };

        let latest = latest_subscriptions(vec![newest, older]);

        assert_eq!(
            latest.get(&user).map(|row| row.status.as_str()),
            Some("confirmed")
        );
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            status: "deleted".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = to_summary(row, None).expect_err("unknown status");
        assert!(matches!(err, UserDirectoryRepositoryError::Query { .. }));
    }
}
