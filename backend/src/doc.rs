//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer (registration, admin
//!   panel, health)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`FieldErrorSchema`]) that provide OpenAPI definitions without coupling
//!   domain types to the utoipa framework
//! - **Security**: bearer token authentication for the admin endpoints
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, FieldErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "AdminBearer";

/// Enrich the generated document with the admin bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/admin/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Landing page backend API",
        description = "Sign-up registration, admin panel and health endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AdminBearer" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::public_stats,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::admin_stats,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema, FieldErrorSchema)),
    tags(
        (name = "users", description = "Public sign-up endpoints"),
        (name = "admin", description = "Admin panel endpoints"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
