//! Welcome email adapters.
//!
//! [`SmtpWelcomeMailer`] delivers through a pooled async SMTP transport;
//! [`DisabledWelcomeMailer`] stands in when no relay is configured.

mod disabled_welcome_mailer;
mod smtp_welcome_mailer;
mod template;

pub use disabled_welcome_mailer::{DisabledWelcomeMailer, SMTP_NOT_CONFIGURED};
pub use smtp_welcome_mailer::{
    IMPLICIT_TLS_PORT, SmtpConfig, SmtpConfigError, SmtpSecurity, SmtpWelcomeMailer,
};
pub use template::{WELCOME_SUBJECT, render_welcome};
