//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MockAdminSession, MockPublicStatsQuery, MockUserDirectoryQuery, MockUserRegistration,
};
use crate::domain::{AdminId, SUPER_ADMIN_ROLE, SessionClaims};

use super::state::HttpState;

/// Mocked driving ports; set expectations, then call [`StatePorts::into_data`].
///
/// Ports without expectations panic when a handler reaches them.
#[derive(Default)]
pub struct StatePorts {
    pub registration: MockUserRegistration,
    pub admin_session: MockAdminSession,
    pub directory: MockUserDirectoryQuery,
    pub public_stats: MockPublicStatsQuery,
}

impl StatePorts {
    /// Wrap the mocks in the shared handler state.
    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.registration),
            Arc::new(self.admin_session),
            Arc::new(self.directory),
            Arc::new(self.public_stats),
        ))
    }

    /// Accept `token` as a valid bearer token.
    pub fn accept_token(mut self, token: &'static str) -> Self {
        self.admin_session
            .expect_authenticate()
            .withf(move |candidate| candidate == token)
            .returning(|_| Ok(sample_claims()));
        self
    }
}

/// Claims for the seeded super admin.
pub fn sample_claims() -> SessionClaims {
    SessionClaims {
        sub: AdminId::from_uuid(uuid::Uuid::nil()),
        username: "admin".to_owned(),
        role: SUPER_ADMIN_ROLE.to_owned(),
        iat: 1_741_618_800,
        exp: 1_741_705_200,
    }
}

/// Parse an RFC 3339 timestamp.
pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
