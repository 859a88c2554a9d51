//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed values for sign-ups, admin sessions and
//! reporting, plus the services that implement the driving ports. Nothing in
//! this module knows about HTTP, SQL or SMTP.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TraceId — request correlation identifier held in task-local storage.
//! - RegistrationService, AdminSessionService, UserDirectoryService — use-case
//!   implementations wired by the server.

pub mod admin;
pub mod admin_session_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod registration_service;
pub mod stats;
pub mod subscription;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;
pub mod user_query;

pub use self::admin::{Admin, AdminId, NewAdmin, SUPER_ADMIN_ROLE};
pub use self::admin_session_service::{AdminSessionService, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{
    AdminLogin, AdminProfile, LoginCredentials, LoginValidationError, PASSWORD_MIN, SessionClaims,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldError};
pub use self::registration_service::{DUPLICATE_EMAIL_MESSAGE, RegistrationService};
pub use self::stats::{
    AdminStats, AdminStatsOverview, DailyRegistrations, PublicStats, StatsPeriod,
    StatsPeriodError, StatsWindows,
};
pub use self::subscription::{FREE_BOOK_SUBSCRIPTION, SubscriptionStatus};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, LANDING_PAGE_SOURCE, RegisteredUser, Registration, RequestOrigin, UserId,
    UserName, UserStatus, UserSummary, UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;
pub use self::user_query::{SearchTerm, SearchTermTooLong, StatusFilter, UserListFilter, UserPage};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use landing_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
