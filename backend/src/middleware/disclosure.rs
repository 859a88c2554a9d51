//! Scopes internal error disclosure for every request.
//!
//! Development deployments keep the original message of internal errors in
//! response bodies; production replaces it with a generic message.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::error::with_internal_disclosure;

/// Middleware running each request with a fixed disclosure flag.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use landing_backend::middleware::ErrorDisclosure;
///
/// let app = App::new().wrap(ErrorDisclosure::new(false));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ErrorDisclosure {
    disclose_internal: bool,
}

impl ErrorDisclosure {
    /// `true` keeps internal error messages in response bodies.
    pub fn new(disclose_internal: bool) -> Self {
        Self { disclose_internal }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorDisclosure
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorDisclosureMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorDisclosureMiddleware {
            service,
            disclose_internal: self.disclose_internal,
        }))
    }
}

/// Service wrapper produced by [`ErrorDisclosure`].
pub struct ErrorDisclosureMiddleware<S> {
    service: S,
    disclose_internal: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorDisclosureMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(with_internal_disclosure(self.disclose_internal, fut))
    }
}
