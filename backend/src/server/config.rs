//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) rate_limit_window: Duration,
    pub(crate) rate_limit_max_requests: u32,
    pub(crate) disclose_internal_errors: bool,
}

impl ServerConfig {
    /// Construct a configuration with a 100 requests per 15 minutes limit,
    /// no allowed CORS origins and redacted internal errors.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_origins: Vec::new(),
            rate_limit_window: Duration::from_secs(15 * 60),
            rate_limit_max_requests: 100,
            disclose_internal_errors: false,
        }
    }

    /// Allow cross-origin requests carrying credentials from `origins`.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Allow `max_requests` per client IP within each `window`.
    #[must_use]
    pub fn with_rate_limit(mut self, window: Duration, max_requests: u32) -> Self {
        self.rate_limit_window = window;
        self.rate_limit_max_requests = max_requests;
        self
    }

    /// Keep internal error messages in response bodies.
    #[must_use]
    pub fn with_internal_error_disclosure(mut self, enabled: bool) -> Self {
        self.disclose_internal_errors = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by tests; retained for fixture access")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
