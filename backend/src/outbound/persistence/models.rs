//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date};
use uuid::Uuid;

use super::schema::{admins, subscriptions, system_logs, users};

/// Columns returned after inserting a user.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RegisteredUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the admin listing.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new sign-ups.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub status: &'a str,
    pub source: &'a str,
}

// ---------------------------------------------------------------------------
// Subscription models
// ---------------------------------------------------------------------------

/// Row struct for reading subscription state.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscriptionRow {
    pub user_id: Uuid,
    pub status: String,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Insertable struct for new subscriptions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct NewSubscriptionRow<'a> {
    pub user_id: Uuid,
    pub subscription_type: &'a str,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Audit log models
// ---------------------------------------------------------------------------

/// Insertable struct for audit entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = system_logs)]
pub(crate) struct NewSystemLogRow<'a> {
    pub action: &'a str,
    pub user_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Admin models
// ---------------------------------------------------------------------------

/// Row struct for reading admin accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for seeded admin accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admins)]
pub(crate) struct NewAdminRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Aggregate rows (raw SQL)
// ---------------------------------------------------------------------------

/// Dashboard overview counts.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct OverviewRow {
    #[diesel(sql_type = BigInt)]
    pub total_users: i64,
    #[diesel(sql_type = BigInt)]
    pub users_this_period: i64,
    #[diesel(sql_type = BigInt)]
    pub users_this_week: i64,
    #[diesel(sql_type = BigInt)]
    pub users_today: i64,
    #[diesel(sql_type = BigInt)]
    pub active_users: i64,
    #[diesel(sql_type = BigInt)]
    pub inactive_users: i64,
    #[diesel(sql_type = BigInt)]
    pub banned_users: i64,
}

/// Public landing page counts.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PublicStatsRow {
    #[diesel(sql_type = BigInt)]
    pub total_users: i64,
    #[diesel(sql_type = BigInt)]
    pub users_this_week: i64,
    #[diesel(sql_type = BigInt)]
    pub users_today: i64,
}

/// Registrations on one UTC day.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct DailyCountRow {
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
