//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`UserRegistration`, `AdminSession`, `UserDirectoryQuery`,
//! `PublicStatsQuery`) are called by inbound adapters. Driven ports are
//! implemented by outbound adapters and consumed by domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_repository;
mod admin_session;
mod credential_hasher;
mod registration_repository;
mod session_tokens;
mod user_directory_query;
mod user_directory_repository;
mod user_registration;
mod welcome_mailer;

#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError};
#[cfg(test)]
pub use admin_session::MockAdminSession;
pub use admin_session::AdminSession;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use registration_repository::MockRegistrationRepository;
pub use registration_repository::{RegistrationRepository, RegistrationRepositoryError};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokenError, SessionTokens};
#[cfg(test)]
pub use user_directory_query::{MockPublicStatsQuery, MockUserDirectoryQuery};
pub use user_directory_query::{PublicStatsQuery, UserDirectoryQuery};
#[cfg(test)]
pub use user_directory_repository::MockUserDirectoryRepository;
pub use user_directory_repository::{UserDirectoryRepository, UserDirectoryRepositoryError};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use welcome_mailer::MockWelcomeMailer;
pub use welcome_mailer::{DeliveryReceipt, WelcomeMailer, WelcomeMailerError};
