//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AdminSession, PublicStatsQuery, UserDirectoryQuery, UserRegistration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Public sign-up use-case.
    pub registration: Arc<dyn UserRegistration>,
    /// Admin login and token verification.
    pub admin_session: Arc<dyn AdminSession>,
    /// Admin listing and dashboard statistics.
    pub directory: Arc<dyn UserDirectoryQuery>,
    /// Counters shown on the landing page.
    pub public_stats: Arc<dyn PublicStatsQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    pub fn new(
        registration: Arc<dyn UserRegistration>,
        admin_session: Arc<dyn AdminSession>,
        directory: Arc<dyn UserDirectoryQuery>,
        public_stats: Arc<dyn PublicStatsQuery>,
    ) -> Self {
        Self {
            registration,
            admin_session,
            directory,
            public_stats,
        }
    }
}
