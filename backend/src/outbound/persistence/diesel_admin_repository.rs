//! PostgreSQL-backed admin account adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminRepository, AdminRepositoryError};
use crate::domain::{Admin, AdminId, NewAdmin};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AdminRow, NewAdminRow};
use super::pool::{DbPool, PoolError};
use super::schema::admins;

/// Diesel-backed implementation of the admin repository.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_admin_pool_error(error: PoolError) -> AdminRepositoryError {
    map_pool_error(error, AdminRepositoryError::connection)
}

fn map_admin_diesel_error(error: diesel::result::Error) -> AdminRepositoryError {
    map_diesel_error(
        error,
        AdminRepositoryError::query,
        AdminRepositoryError::connection,
    )
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: AdminId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            last_login: row.last_login,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;
        let row = admins::table
            .filter(admins::username.eq(username))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_admin_diesel_error)?;
        Ok(row.map(Admin::from))
    }

    async fn record_login(
        &self,
        id: &AdminId,
        at: DateTime<Utc>,
    ) -> Result<(), AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;
        diesel::update(admins::table.find(*id.as_uuid()))
            .set(admins::last_login.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map_err(map_admin_diesel_error)?;
        Ok(())
    }

    async fn create_if_absent(&self, admin: &NewAdmin) -> Result<bool, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;
        let inserted = diesel::insert_into(admins::table)
            .values(&NewAdminRow {
                username: &admin.username,
                email: &admin.email,
                password_hash: &admin.password_hash,
                role: &admin.role,
            })
            .on_conflict(admins::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_admin_diesel_error)?;
        Ok(inserted == 1)
    }
}
