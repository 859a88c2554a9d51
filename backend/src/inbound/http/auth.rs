//! Bearer token extraction for admin endpoints.
//!
//! A missing or malformed `Authorization` header is `401 Unauthorized`; a
//! token that fails verification is `403 Forbidden`.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, SessionClaims};

use super::state::HttpState;

/// Message returned when no bearer token accompanies the request.
pub const TOKEN_REQUIRED_MESSAGE: &str = "authentication token required";

/// Claims of the authenticated admin, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AdminClaims(pub SessionClaims);

impl AdminClaims {
    /// Verified claims.
    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }
}

/// Token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn extract(req: &HttpRequest) -> Result<AdminClaims, Error> {
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized(TOKEN_REQUIRED_MESSAGE))?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not registered"))?;
    state.admin_session.authenticate(token).map(AdminClaims)
}

impl FromRequest for AdminClaims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
