//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{ServiceDependencies, build_http_state, build_mailer};

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use landing_backend::doc::ApiDoc;
use landing_backend::inbound::http::admin::{admin_stats, list_users, login};
use landing_backend::inbound::http::fallback::{json_config, not_found, query_config};
use landing_backend::inbound::http::health::{HealthState, api_health, live, ready};
use landing_backend::inbound::http::state::HttpState;
use landing_backend::inbound::http::users::{public_stats, register};
use landing_backend::middleware::{ErrorDisclosure, RateLimit, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_origins: Vec<String>,
    rate_limit: RateLimit,
    disclosure: ErrorDisclosure,
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(600)
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"))
        .add((header::CONTENT_SECURITY_POLICY, "default-src 'self'"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
        .add(("X-DNS-Prefetch-Control", "off"))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_origins,
        rate_limit,
        disclosure,
    } = deps;

    let api = web::scope("/api")
        .service(register)
        .service(public_stats)
        .service(login)
        .service(list_users)
        .service(admin_stats)
        .service(api_health);

    let app = App::new()
        .app_data(json_config())
        .app_data(query_config())
        .app_data(health_state)
        .app_data(http_state)
        .wrap(disclosure)
        .wrap(rate_limit)
        .wrap(security_headers())
        .wrap(cors(&cors_origins))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `http_state`: driving ports shared by every worker.
/// - `config`: pre-built [`ServerConfig`] with binding, CORS, rate limit and
///   error disclosure settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        cors_origins,
        rate_limit_window,
        rate_limit_max_requests,
        disclose_internal_errors,
    } = config;
    // One limiter shared by every worker.
    let rate_limit = RateLimit::new(rate_limit_window, rate_limit_max_requests);
    let disclosure = ErrorDisclosure::new(disclose_internal_errors);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors_origins: cors_origins.clone(),
            rate_limit: rate_limit.clone(),
            disclosure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
