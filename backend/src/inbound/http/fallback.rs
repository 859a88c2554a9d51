//! Extractor configuration and the catch-all route.
//!
//! Malformed JSON bodies and query strings are answered with the same
//! `invalid_request` envelope as field validation failures.

use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::Error;

use super::ApiResult;

/// Largest accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Message of the catch-all 404.
pub const NOT_FOUND_MESSAGE: &str = "the requested resource was not found";

/// JSON extractor settings shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| Error::invalid_request(format!("invalid JSON body: {err}")).into())
}

/// Query extractor settings shared by every handler.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    })
}

/// Default service for unmatched routes.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    tracing::debug!(method = %req.method(), path = %req.path(), "no route matched");
    Err(Error::not_found(NOT_FOUND_MESSAGE))
}
