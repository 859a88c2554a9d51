//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
