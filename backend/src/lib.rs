//! Landing page backend: sign-up registration, welcome email and the admin
//! panel API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod logging;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

#[cfg(test)]
mod test_support;
