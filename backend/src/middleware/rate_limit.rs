//! Fixed-window request limiting keyed by client IP.
//!
//! Every client address gets a counter that resets when its window elapses.
//! Requests beyond the limit are answered with a `too_many_requests` envelope
//! and a `Retry-After` header without reaching the handler.

use std::net::IpAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use dashmap::DashMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Error as DomainError;

/// Message returned once a client exceeds its allowance.
pub const RATE_LIMITED_MESSAGE: &str = "too many requests, please try again later";

/// Counters are swept once this many clients are tracked.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request fits in the current window.
    Allowed {
        /// Requests left before the window fills.
        remaining: u32,
    },
    /// The window is full.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

/// Per-client fixed-window counters.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<IpAddr, Window>,
}

impl FixedWindowLimiter {
    /// Allow `max_requests` per client within each `window`.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
        }
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: IpAddr, now: Instant) -> Decision {
        if self.windows.len() >= SWEEP_THRESHOLD {
            self.sweep(now);
        }
        let mut entry = self.windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count >= self.max_requests {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started));
            return Decision::Limited { retry_after };
        }
        entry.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drop counters whose window has elapsed.
    fn sweep(&self, now: Instant) {
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started) < self.window);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Middleware applying a shared [`FixedWindowLimiter`] to every request.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use actix_web::App;
/// use landing_backend::middleware::RateLimit;
///
/// let app = App::new().wrap(RateLimit::new(Duration::from_secs(900), 100));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<FixedWindowLimiter>,
}

impl RateLimit {
    /// Build the middleware with a fresh limiter.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::new(window, max_requests)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<FixedWindowLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Requests without a peer address (in-process tests) are not counted.
        let Some(client) = req.peer_addr().map(|addr| addr.ip()) else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        match self.limiter.check(client, Instant::now()) {
            Decision::Allowed { .. } => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Decision::Limited { retry_after } => {
                warn!(%client, path = %req.path(), "rate limit exceeded");
                let mut response =
                    DomainError::too_many_requests(RATE_LIMITED_MESSAGE).error_response();
                let seconds = retry_after.as_secs().max(1);
                if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                    response.headers_mut().insert(RETRY_AFTER, value);
                }
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}
