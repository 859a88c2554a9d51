//! Admin panel API handlers.
//!
//! ```text
//! POST /api/admin/login {"username":"admin","password":"admin123"}
//! GET /api/admin/users?page=1&limit=20&search=ann&status=active
//! GET /api/admin/stats?period=30
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use pagination::{DEFAULT_LIMIT, PageRequest, PageRequestError, Pagination};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    AdminLogin, AdminStats, AdminStatsOverview, DailyRegistrations, Error, FieldError,
    LoginCredentials, SearchTerm, StatsPeriod, StatusFilter, UserListFilter, UserPage, UserSummary,
};

use super::ApiResult;
use super::auth::AdminClaims;
use super::envelope::Envelope;
use super::schemas::ErrorSchema;
use super::state::HttpState;
use super::validation::{FieldErrors, validation_error};

/// Message returned with a successful login.
pub const LOGIN_MESSAGE: &str = "login successful";

/// Login request body for `POST /api/admin/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Admin login name.
    #[serde(default)]
    #[schema(example = "admin")]
    pub username: String,
    /// Password, at least six characters.
    #[serde(default)]
    #[schema(example = "admin123")]
    pub password: String,
}

/// Admin profile returned by a login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileBody {
    /// Admin identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Role name.
    pub role: String,
    /// Login before this one, `null` on the first login.
    pub last_login: Option<DateTime<Utc>>,
}

/// Token and profile returned by `POST /api/admin/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginBody {
    /// Bearer token for the admin endpoints.
    pub token: String,
    /// Authenticated admin.
    pub admin: AdminProfileBody,
}

impl From<AdminLogin> for LoginBody {
    fn from(session: AdminLogin) -> Self {
        let AdminLogin { token, admin } = session;
        Self {
            token,
            admin: AdminProfileBody {
                id: *admin.id.as_uuid(),
                username: admin.username,
                role: admin.role,
                last_login: admin.last_login,
            },
        }
    }
}

/// Query string of `GET /api/admin/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// One-based page number, default 1.
    pub page: Option<u32>,
    /// Page size, 1 to 100, default 20.
    pub limit: Option<u32>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
    /// `active`, `inactive`, `banned` or `all` (default).
    pub status: Option<String>,
}

impl UserListQuery {
    fn into_filter(self) -> Result<UserListFilter, Error> {
        let mut errors = FieldErrors::new();
        let page = match PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        ) {
            Ok(page) => Some(page),
            Err(err @ PageRequestError::PageOutOfRange) => {
                errors.push("page", "invalid_range", err);
                None
            }
            Err(err @ PageRequestError::LimitOutOfRange { .. }) => {
                errors.push("limit", "invalid_range", err);
                None
            }
        };
        let search = errors
            .check(
                "search",
                |_| "invalid_length",
                SearchTerm::parse(self.search.as_deref().unwrap_or_default()),
            )
            .flatten();
        let status = errors.check(
            "status",
            |err| err.code(),
            self.status.as_deref().map_or(Ok(StatusFilter::All), str::parse),
        );
        errors.finish()?;
        match (page, status) {
            (Some(page), Some(status)) => Ok(UserListFilter {
                page,
                search,
                status,
            }),
            _ => Err(Error::internal("validated listing filter lost a field")),
        }
    }
}

/// One row of the admin user listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryBody {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// `active`, `inactive` or `banned`.
    pub status: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Latest subscription status, `pending` or `confirmed`.
    pub subscription_status: Option<String>,
    /// Confirmation time of the latest subscription.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl From<UserSummary> for UserSummaryBody {
    fn from(user: UserSummary) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name,
            email: user.email,
            status: user.status.as_str().to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            subscription_status: user
                .subscription_status
                .map(|status| status.as_str().to_owned()),
            confirmed_at: user.confirmed_at,
        }
    }
}

/// Page position returned next to a listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationBody {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Rows matching the filter.
    pub total: u64,
    /// Pages needed to cover `total`.
    pub pages: u64,
}

impl From<Pagination> for PaginationBody {
    fn from(pagination: Pagination) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total: pagination.total,
            pages: pagination.pages,
        }
    }
}

/// Payload of `GET /api/admin/users`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListBody {
    /// Users on this page, newest first.
    pub users: Vec<UserSummaryBody>,
    /// Page position.
    pub pagination: PaginationBody,
}

impl From<UserPage> for UserListBody {
    fn from(page: UserPage) -> Self {
        Self {
            users: page.users.into_iter().map(UserSummaryBody::from).collect(),
            pagination: page.pagination.into(),
        }
    }
}

/// Query string of `GET /api/admin/stats`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Reporting period in days, 1 to 365, default 30.
    pub period: Option<u16>,
}

/// Aggregate counters of the admin dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewBody {
    /// All users.
    pub total_users: u64,
    /// Users registered within the period.
    pub users_this_period: u64,
    /// Users registered within seven days.
    pub users_this_week: u64,
    /// Users registered since yesterday's midnight (UTC).
    pub users_today: u64,
    /// Users with status `active`.
    pub active_users: u64,
    /// Users with status `inactive`.
    pub inactive_users: u64,
    /// Users with status `banned`.
    pub banned_users: u64,
}

impl From<AdminStatsOverview> for OverviewBody {
    fn from(overview: AdminStatsOverview) -> Self {
        Self {
            total_users: overview.total_users,
            users_this_period: overview.users_this_period,
            users_this_week: overview.users_this_week,
            users_today: overview.users_today,
            active_users: overview.active_users,
            inactive_users: overview.inactive_users,
            banned_users: overview.banned_users,
        }
    }
}

/// Registrations on one UTC day.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrendBody {
    /// Calendar day.
    pub date: NaiveDate,
    /// Users created that day.
    pub count: u64,
}

impl From<DailyRegistrations> for TrendBody {
    fn from(day: DailyRegistrations) -> Self {
        Self {
            date: day.date,
            count: day.count,
        }
    }
}

/// Payload of `GET /api/admin/stats`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsBody {
    /// Aggregate counters.
    pub overview: OverviewBody,
    /// Daily registrations, ascending by date.
    pub trends: Vec<TrendBody>,
}

impl From<AdminStats> for AdminStatsBody {
    fn from(stats: AdminStats) -> Self {
        Self {
            overview: stats.overview.into(),
            trends: stats.trends.into_iter().map(TrendBody::from).collect(),
        }
    }
}

/// Verify admin credentials and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Envelope<LoginBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(|problems| {
            validation_error(
                problems
                    .iter()
                    .map(|problem| {
                        FieldError::new(
                            problem.field(),
                            problem.code(),
                            problem.to_string(),
                        )
                    })
                    .collect(),
            )
        })?;
    let session = state.admin_session.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(Envelope::with_message(LOGIN_MESSAGE, LoginBody::from(session))))
}

/// Paginated, filterable user listing.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = Envelope<UserListBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    admin: AdminClaims,
    query: web::Query<UserListQuery>,
) -> ApiResult<web::Json<Envelope<UserListBody>>> {
    let filter = query.into_inner().into_filter()?;
    let page = state.directory.list_users(filter).await?;
    info!(
        admin = %admin.claims().username,
        returned = page.users.len(),
        total = page.pagination.total,
        "admin listed users"
    );
    Ok(web::Json(Envelope::new(page.into())))
}

/// Dashboard counters and daily registration trend.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Statistics", body = Envelope<AdminStatsBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/admin/stats")]
pub async fn admin_stats(
    state: web::Data<HttpState>,
    _admin: AdminClaims,
    query: web::Query<StatsQuery>,
) -> ApiResult<web::Json<Envelope<AdminStatsBody>>> {
    let period = match query.period {
        Some(days) => StatsPeriod::new(days).map_err(|err| {
            validation_error(vec![FieldError::new(
                "period",
                "invalid_range",
                err.to_string(),
            )])
        })?,
        None => StatsPeriod::default(),
    };
    let stats = state.directory.admin_stats(period).await?;
    Ok(web::Json(Envelope::new(stats.into())))
}
