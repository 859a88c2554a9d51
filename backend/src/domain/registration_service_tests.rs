//! Tests for the registration workflow.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    DeliveryReceipt, MockRegistrationRepository, MockWelcomeMailer, WelcomeMailerError,
};
use crate::domain::{EmailAddress, ErrorCode, RequestOrigin, UserId, UserName};
use crate::test_support::{FixtureClock, fixture_now};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

#[fixture]
fn registration() -> Registration {
    Registration {
        name: UserName::new("Alice").expect("valid name"),
        email: EmailAddress::new("alice@example.com").expect("valid email"),
        origin: RequestOrigin {
            ip_address: Some("203.0.113.7".to_owned()),
            user_agent: Some("test-agent".to_owned()),
        },
    }
}

fn stored_user(id: UserId) -> RegisteredUser {
    RegisteredUser {
        id,
        name: "Alice".to_owned(),
        email: "alice@example.com".to_owned(),
        registered_at: fixture_now(),
    }
}

fn make_service(
    repo: MockRegistrationRepository,
    mailer: MockWelcomeMailer,
) -> RegistrationService<MockRegistrationRepository, MockWelcomeMailer> {
    RegistrationService::new(
        Arc::new(repo),
        Arc::new(mailer),
        Arc::new(FixtureClock::at(fixture_now())),
    )
}

fn receipt() -> DeliveryReceipt {
    DeliveryReceipt {
        message_id: "<1@example.com>".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn register_confirms_subscription_after_mail(registration: Registration) {
    let user_id = UserId::random();
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists()
        .times(1)
        .return_once(|_| Ok(false));
    repo.expect_create_registration()
        .times(1)
        .return_once(move |_| Ok(stored_user(user_id)));
    repo.expect_confirm_subscription()
        .with(eq(user_id), eq(fixture_now()))
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut mailer = MockWelcomeMailer::new();
    mailer
        .expect_send_welcome()
        .times(1)
        .return_once(|_, _| Ok(receipt()));

    let user = make_service(repo, mailer)
        .register(registration)
        .await
        .expect("registration succeeds");

    assert_eq!(user.id, user_id);
    assert_eq!(user.email, "alice@example.com");
}

#[rstest]
#[tokio::test]
async fn register_rejects_known_email_without_writing(registration: Registration) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists().times(1).return_once(|_| Ok(true));
    repo.expect_create_registration().never();
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().never();

    let error = make_service(repo, mailer)
        .register(registration)
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn register_maps_racing_duplicate_to_conflict(registration: Registration) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists().return_once(|_| Ok(false));
    repo.expect_create_registration()
        .return_once(|_| Err(RegistrationRepositoryError::duplicate_email("alice@example.com")));
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().never();

    let error = make_service(repo, mailer)
        .register(registration)
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn register_succeeds_when_mail_fails_and_leaves_pending(registration: Registration) {
    let user_id = UserId::random();
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists().return_once(|_| Ok(false));
    repo.expect_create_registration()
        .return_once(move |_| Ok(stored_user(user_id)));
    repo.expect_confirm_subscription().never();
    let mut mailer = MockWelcomeMailer::new();
    mailer
        .expect_send_welcome()
        .times(1)
        .return_once(|_, _| Err(WelcomeMailerError::delivery("relay refused")));

    let user = make_service(repo, mailer)
        .register(registration)
        .await
        .expect("mail failure is swallowed");

    assert_eq!(user.id, user_id);
}

#[rstest]
#[tokio::test]
async fn register_swallows_confirmation_failure(registration: Registration) {
    let user_id = UserId::random();
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists().return_once(|_| Ok(false));
    repo.expect_create_registration()
        .return_once(move |_| Ok(stored_user(user_id)));
    repo.expect_confirm_subscription()
        .times(1)
        .return_once(|_, _| Err(RegistrationRepositoryError::query("deadlock")));
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().return_once(|_, _| Ok(receipt()));

    let result = make_service(repo, mailer).register(registration).await;

    assert!(result.is_ok());
}

#[rstest]
#[case(RegistrationRepositoryError::connection("refused"), ErrorCode::InternalError)]
#[case(RegistrationRepositoryError::query("rollback"), ErrorCode::InternalError)]
#[tokio::test]
async fn register_maps_store_failures(
    registration: Registration,
    #[case] failure: RegistrationRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_email_exists().return_once(|_| Ok(false));
    repo.expect_create_registration()
        .return_once(move |_| Err(failure));
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().never();

    let error = make_service(repo, mailer)
        .register(registration)
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), expected);
}
