//! Success half of the response envelope.
//!
//! Failures serialise through [`crate::domain::Error`], which carries
//! `success: false`.

use serde::Serialize;
use utoipa::ToSchema;

/// `{ "success": true, "message"?, "data" }` wrapper for handler payloads.
///
/// # Examples
/// ```
/// use landing_backend::inbound::http::envelope::Envelope;
///
/// let body = serde_json::to_value(Envelope::new(42)).unwrap();
/// assert_eq!(body, serde_json::json!({ "success": true, "data": 42 }));
/// ```
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`.
    success: bool,
    /// Human-readable outcome, present on commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// Endpoint payload.
    data: T,
}

impl<T> Envelope<T> {
    /// Wrap `data` without a message.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Wrap `data` with a human-readable message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}
