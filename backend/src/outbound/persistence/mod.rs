//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to the port
//!   error types, keeping the driver message.
//!
//! # Example
//!
//! ```no_run
//! use landing_backend::outbound::persistence::{
//!     DbPool, DieselUserDirectoryRepository, PoolConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/landing")).await?;
//! let directory = DieselUserDirectoryRepository::new(pool);
//! # let _ = directory;
//! # Ok(())
//! # }
//! ```

mod diesel_admin_repository;
mod diesel_registration_repository;
mod diesel_user_directory_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_registration_repository::{DieselRegistrationRepository, USER_REGISTERED_ACTION};
pub use diesel_user_directory_repository::DieselUserDirectoryRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig,
    PoolError,
};
