//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.
//!
//! Internal and service-unavailable messages may carry driver or relay text,
//! so they are replaced by a fixed message unless the request runs inside
//! [`with_internal_disclosure`] with disclosure enabled.

use std::future::Future;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tokio::task_local;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned in place of redacted internal errors.
pub const REDACTED_INTERNAL_MESSAGE: &str = "Internal server error";
/// Message returned in place of redacted service-unavailable errors.
pub const REDACTED_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

task_local! {
    static DISCLOSE_INTERNAL: bool;
}

/// Run `fut` with internal error disclosure switched on or off.
pub async fn with_internal_disclosure<Fut>(enabled: bool, fut: Fut) -> Fut::Output
where
    Fut: Future,
{
    DISCLOSE_INTERNAL.scope(enabled, fut).await
}

fn discloses_internal() -> bool {
    DISCLOSE_INTERNAL.try_with(|flag| *flag).unwrap_or(false)
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redacted_message(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::InternalError => Some(REDACTED_INTERNAL_MESSAGE),
        ErrorCode::ServiceUnavailable => Some(REDACTED_UNAVAILABLE_MESSAGE),
        _ => None,
    }
}

pub(crate) fn redact_for_client(error: &Error) -> Error {
    match redacted_message(error.code()) {
        Some(message) if !discloses_internal() => {
            let mut redacted = Error::new(error.code(), message);
            if let Some(id) = error.trace_id() {
                redacted = redacted.with_trace_id(id.to_owned());
            }
            redacted
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if redacted_message(self.code()).is_some() {
            error!(
                code = ?self.code(),
                message = %self.message(),
                trace_id = ?self.trace_id(),
                "server-side failure"
            );
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_for_client(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_INTERNAL_MESSAGE)
    }
}
