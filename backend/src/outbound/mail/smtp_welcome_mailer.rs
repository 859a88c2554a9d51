//! SMTP implementation of the welcome mailer port.
//!
//! One pooled async transport is built at startup and shared by every
//! request. Each message gets a generated `Message-ID` so the receipt can be
//! correlated with relay logs.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::AsyncSmtpTransportBuilder;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{DeliveryReceipt, WelcomeMailer, WelcomeMailerError};
use crate::domain::{EmailAddress, UserName};

use super::template::{WELCOME_SUBJECT, render_welcome};

/// Port on which relays expect TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// How the connection to the relay is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS).
    ImplicitTls,
    /// STARTTLS is mandatory; delivery fails if the relay does not offer it.
    RequiredStartTls,
    /// STARTTLS when the relay offers it, plaintext otherwise.
    OpportunisticStartTls,
}

impl SmtpSecurity {
    /// Security mode for `port`; `require_starttls` only matters off port 465.
    ///
    /// # Examples
    /// ```
    /// use landing_backend::outbound::mail::SmtpSecurity;
    ///
    /// assert_eq!(SmtpSecurity::for_port(465, false), SmtpSecurity::ImplicitTls);
    /// assert_eq!(SmtpSecurity::for_port(587, true), SmtpSecurity::RequiredStartTls);
    /// ```
    pub const fn for_port(port: u16, require_starttls: bool) -> Self {
        if port == IMPLICIT_TLS_PORT {
            Self::ImplicitTls
        } else if require_starttls {
            Self::RequiredStartTls
        } else {
            Self::OpportunisticStartTls
        }
    }
}

/// Connection details for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Login user; also the sender address.
    pub user: String,
    /// Login password.
    pub password: Zeroizing<String>,
    /// Transport security.
    pub security: SmtpSecurity,
    /// Display name used in the `From` header.
    pub from_name: String,
}

/// Errors raised while building the SMTP transport.
#[derive(Debug, thiserror::Error)]
pub enum SmtpConfigError {
    /// The sender address is not a valid mailbox.
    #[error("invalid sender address {address}: {message}")]
    Sender {
        /// Rejected address.
        address: String,
        /// Parser message.
        message: String,
    },
    /// The relay could not be configured.
    #[error("invalid smtp relay {host}: {message}")]
    Relay {
        /// Relay host.
        host: String,
        /// Transport message.
        message: String,
    },
}

/// Sends the welcome email through an SMTP relay.
#[derive(Clone)]
pub struct SmtpWelcomeMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpWelcomeMailer {
    /// Build the pooled transport described by `config`.
    ///
    /// No connection is opened until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns [`SmtpConfigError`] when the sender address or relay settings
    /// are unusable.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpConfigError> {
        let sender = sender_mailbox(&config.from_name, &config.user)?;
        let transport = transport_builder(config)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.as_str().to_owned(),
            ))
            .build();
        Ok(Self { transport, sender })
    }
}

fn transport_builder(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransportBuilder, SmtpConfigError> {
    let relay_error = |err: lettre::transport::smtp::Error| SmtpConfigError::Relay {
        host: config.host.clone(),
        message: err.to_string(),
    };
    match config.security {
        SmtpSecurity::ImplicitTls => {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(relay_error)
        }
        SmtpSecurity::RequiredStartTls => {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(relay_error)
        }
        SmtpSecurity::OpportunisticStartTls => {
            let parameters = TlsParameters::new(config.host.clone()).map_err(relay_error)?;
            Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .tls(Tls::Opportunistic(parameters)))
        }
    }
}

impl std::fmt::Debug for SmtpWelcomeMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpWelcomeMailer")
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

fn sender_mailbox(from_name: &str, user: &str) -> Result<Mailbox, SmtpConfigError> {
    let address = user
        .parse::<Address>()
        .map_err(|err| SmtpConfigError::Sender {
            address: user.to_owned(),
            message: err.to_string(),
        })?;
    let name = Some(from_name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned);
    Ok(Mailbox::new(name, address))
}

/// `<uuid@domain>` using the sender's domain.
fn message_id(sender: &Mailbox) -> String {
    format!("<{}@{}>", Uuid::new_v4(), sender.email.domain())
}

fn build_message(
    sender: &Mailbox,
    email: &EmailAddress,
    name: &UserName,
    message_id: &str,
) -> Result<Message, WelcomeMailerError> {
    let recipient = email
        .as_ref()
        .parse::<Address>()
        .map_err(|err| WelcomeMailerError::delivery(format!("invalid recipient: {err}")))?;
    Message::builder()
        .from(sender.clone())
        .to(Mailbox::new(Some(name.as_ref().to_owned()), recipient))
        .subject(WELCOME_SUBJECT)
        .message_id(Some(message_id.to_owned()))
        .header(ContentType::TEXT_HTML)
        .body(render_welcome(name.as_ref(), email.as_ref()))
        .map_err(|err| WelcomeMailerError::delivery(err.to_string()))
}

#[async_trait]
impl WelcomeMailer for SmtpWelcomeMailer {
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        name: &UserName,
    ) -> Result<DeliveryReceipt, WelcomeMailerError> {
        let id = message_id(&self.sender);
        let message = build_message(&self.sender, email, name, &id)?;
        match self.transport.send(message).await {
            Ok(_) => {
                info!(email = %email, message_id = %id, "welcome email sent");
                Ok(DeliveryReceipt { message_id: id })
            }
            Err(err) => {
                warn!(email = %email, error = %err, "welcome email rejected by relay");
                Err(WelcomeMailerError::delivery(err.to_string()))
            }
        }
    }
}
