//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as tracing, rate limiting and error disclosure.

pub mod disclosure;
pub mod rate_limit;
pub mod trace;

pub use disclosure::ErrorDisclosure;
pub use rate_limit::{FixedWindowLimiter, RateLimit};
pub use trace::Trace;
