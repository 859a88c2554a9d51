//! Backend entry-point: loads configuration, wires the database-backed
//! services and serves the REST API with OpenAPI docs in debug builds.

mod server;

use std::fmt::Display;
use std::io;

use actix_web::web;
use tracing::{info, warn};

use landing_backend::inbound::http::health::HealthState;
use landing_backend::logging::init_logging;
use landing_backend::outbound::persistence::DbPool;
use landing_backend::outbound::security::JwtSessionTokens;
use landing_backend::settings::Settings;

use server::{ServerConfig, ServiceDependencies, build_http_state, build_mailer, create_server};

const BINARY_NAME: &str = "landing-backend";

fn startup_error(err: impl Display) -> io::Error {
    io::Error::other(err.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load(BINARY_NAME).map_err(startup_error)?;
    init_logging(&settings.logging).map_err(startup_error)?;

    let environment = settings.server.environment().map_err(startup_error)?;
    let bind_addr = settings.server.bind_addr().map_err(startup_error)?;
    let secret = settings.auth.secret().map_err(startup_error)?;
    let token_lifetime = settings.auth.token_lifetime().map_err(startup_error)?;
    let pool_config = settings.database.pool_config().map_err(startup_error)?;

    let pool = DbPool::new(pool_config).await.map_err(startup_error)?;
    match pool.get().await {
        Ok(_) => info!("database reachable"),
        Err(error) => warn!(%error, "database unreachable; requests will fail until it recovers"),
    }

    let http_state = build_http_state(ServiceDependencies {
        pool,
        mailer: build_mailer(settings.smtp.smtp_config()),
        tokens: JwtSessionTokens::new(&secret),
        token_lifetime,
    });
    let config = ServerConfig::new(bind_addr)
        .with_cors_origins(settings.cors.origins())
        .with_rate_limit(
            settings.rate_limit.window(),
            settings.rate_limit.max_requests(),
        )
        .with_internal_error_disclosure(environment.discloses_internal_errors());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    info!(%bind_addr, ?environment, "server listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
