//! Public sign-up API handlers.
//!
//! ```text
//! POST /api/users/register {"name":"Ann Lee","email":"ann@example.com"}
//! GET /api/users/stats
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    EmailAddress, Error, PublicStats, RegisteredUser, Registration, RequestOrigin, UserName,
};

use super::ApiResult;
use super::envelope::Envelope;
use super::schemas::ErrorSchema;
use super::state::HttpState;
use super::validation::FieldErrors;

/// Message returned with a successful registration.
pub const REGISTERED_MESSAGE: &str =
    "Registration successful! The download link has been sent to your inbox.";

/// Sign-up request body for `POST /api/users/register`.
///
/// Missing fields deserialise as empty strings and are reported by
/// validation, not by the JSON extractor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, 2 to 100 characters.
    #[serde(default)]
    #[schema(example = "Ann Lee")]
    pub name: String,
    /// Contact address.
    #[serde(default)]
    #[schema(example = "ann@example.com")]
    pub email: String,
}

impl RegisterRequest {
    fn into_registration(self, origin: RequestOrigin) -> Result<Registration, Error> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", |err| err.code(), UserName::new(&self.name));
        let email = errors.check("email", |err| err.code(), EmailAddress::new(&self.email));
        errors.finish()?;
        match (name, email) {
            (Some(name), Some(email)) => Ok(Registration {
                name,
                email,
                origin,
            }),
            _ => Err(Error::internal("validated registration lost a field")),
        }
    }
}

/// Created user returned by `POST /api/users/register`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserBody {
    /// User identifier.
    pub id: Uuid,
    /// Name as stored.
    pub name: String,
    /// Normalised email address.
    pub email: String,
    /// Creation time.
    pub registered_at: DateTime<Utc>,
}

impl From<RegisteredUser> for RegisteredUserBody {
    fn from(user: RegisteredUser) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name,
            email: user.email,
            registered_at: user.registered_at,
        }
    }
}

/// Counters returned by `GET /api/users/stats`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicStatsBody {
    /// Active users overall.
    pub total_users: u64,
    /// Active users registered in the last seven days.
    pub users_this_week: u64,
    /// Active users registered since yesterday's midnight (UTC).
    pub users_today: u64,
}

impl From<PublicStats> for PublicStatsBody {
    fn from(stats: PublicStats) -> Self {
        Self {
            total_users: stats.total_users,
            users_this_week: stats.users_this_week,
            users_today: stats.users_today,
        }
    }
}

/// Client address and user agent for the audit log.
pub(crate) fn request_origin(req: &HttpRequest) -> RequestOrigin {
    RequestOrigin {
        ip_address: req.connection_info().realip_remote_addr().map(str::to_owned),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    }
}

/// Register a landing page visitor and send the welcome email.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = Envelope<RegisteredUserBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 429, description = "Too many requests", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = payload.into_inner().into_registration(request_origin(&req))?;
    let user = state.registration.register(registration).await?;
    Ok(HttpResponse::Created().json(Envelope::with_message(
        REGISTERED_MESSAGE,
        RegisteredUserBody::from(user),
    )))
}

/// Public registration counters for the landing page.
#[utoipa::path(
    get,
    path = "/api/users/stats",
    responses(
        (status = 200, description = "Registration counters", body = Envelope<PublicStatsBody>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "publicStats",
    security([])
)]
#[get("/users/stats")]
pub async fn public_stats(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<PublicStatsBody>>> {
    let stats = state.public_stats.public_stats().await?;
    Ok(web::Json(Envelope::new(stats.into())))
}

#[cfg(test)]
mod tests;
