//! Builders for the services behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use landing_backend::domain::ports::WelcomeMailer;
use landing_backend::domain::{AdminSessionService, RegistrationService, UserDirectoryService};
use landing_backend::inbound::http::state::HttpState;
use landing_backend::outbound::mail::{DisabledWelcomeMailer, SmtpConfig, SmtpWelcomeMailer};
use landing_backend::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselRegistrationRepository, DieselUserDirectoryRepository,
};
use landing_backend::outbound::security::{Argon2CredentialHasher, JwtSessionTokens};

/// Inputs needed to assemble the driving ports.
pub struct ServiceDependencies {
    /// Shared connection pool.
    pub pool: DbPool,
    /// Welcome email adapter.
    pub mailer: Arc<dyn WelcomeMailer>,
    /// Token signing and verification.
    pub tokens: JwtSessionTokens,
    /// Lifetime of issued admin tokens.
    pub token_lifetime: chrono::Duration,
}

/// Pick the SMTP mailer when configured, else the logging-only fallback.
///
/// A relay that cannot be set up is logged and replaced by the fallback so
/// registration keeps working with pending subscriptions.
pub fn build_mailer(smtp: Option<SmtpConfig>) -> Arc<dyn WelcomeMailer> {
    let Some(config) = smtp else {
        warn!("SMTP is not configured; welcome emails are disabled");
        return Arc::new(DisabledWelcomeMailer);
    };
    match SmtpWelcomeMailer::new(&config) {
        Ok(mailer) => {
            info!(host = %config.host, port = config.port, "SMTP welcome mailer ready");
            Arc::new(mailer)
        }
        Err(error) => {
            warn!(%error, "SMTP relay rejected; welcome emails are disabled");
            Arc::new(DisabledWelcomeMailer)
        }
    }
}

/// Build the shared HTTP state from the database-backed services.
pub fn build_http_state(deps: ServiceDependencies) -> web::Data<HttpState> {
    let ServiceDependencies {
        pool,
        mailer,
        tokens,
        token_lifetime,
    } = deps;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let registration = RegistrationService::new(
        Arc::new(DieselRegistrationRepository::new(pool.clone())),
        mailer,
        Arc::clone(&clock),
    );
    let admin_session = AdminSessionService::new(
        Arc::new(DieselAdminRepository::new(pool.clone())),
        Arc::new(Argon2CredentialHasher::new()),
        Arc::new(tokens),
        Arc::clone(&clock),
        token_lifetime,
    );
    let directory = Arc::new(UserDirectoryService::new(
        Arc::new(DieselUserDirectoryRepository::new(pool)),
        clock,
    ));

    web::Data::new(HttpState::new(
        Arc::new(registration),
        Arc::new(admin_session),
        directory.clone(),
        directory,
    ))
}
