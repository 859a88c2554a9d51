//! Tests for the public sign-up handlers.

use super::*;
use crate::domain::{DUPLICATE_EMAIL_MESSAGE, UserId};
use crate::inbound::http::test_utils::{StatePorts, at};
use crate::inbound::http::validation::VALIDATION_FAILED_MESSAGE;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

async fn call(ports: StatePorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_data())
            .service(web::scope("/api").service(register).service(public_stats)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

fn register_request(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/users/register")
        .insert_header((header::USER_AGENT, "landing-tests/1.0"))
        .peer_addr("203.0.113.9:5000".parse().expect("addr"))
        .set_json(body)
}

#[rstest]
#[actix_web::test]
async fn registration_returns_created_user() {
    let mut ports = StatePorts::default();
    ports
        .registration
        .expect_register()
        .withf(|registration| {
            registration.name.as_ref() == "Ann Lee"
                && registration.email.as_ref() == "ann@example.com"
                && registration.origin.ip_address.as_deref() == Some("203.0.113.9")
                && registration.origin.user_agent.as_deref() == Some("landing-tests/1.0")
        })
        .times(1)
        .returning(|registration| {
            Ok(RegisteredUser {
                id: UserId::from_uuid(Uuid::nil()),
                name: registration.name.as_ref().to_owned(),
                email: registration.email.as_ref().to_owned(),
                registered_at: at("2025-03-10T15:00:00Z"),
            })
        });

    let (status, body) = call(
        ports,
        register_request(json!({ "name": "  Ann Lee ", "email": "Ann@Example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": REGISTERED_MESSAGE,
            "data": {
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Ann Lee",
                "email": "ann@example.com",
                "registeredAt": "2025-03-10T15:00:00Z"
            }
        })
    );
}

#[rstest]
#[actix_web::test]
async fn every_invalid_field_is_reported() {
    let (status, body) = call(
        StatePorts::default(),
        register_request(json!({ "name": "A", "email": "not-an-address" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], VALIDATION_FAILED_MESSAGE);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors list")
        .iter()
        .filter_map(|entry| entry["field"].as_str())
        .collect();
    assert_eq!(fields, ["name", "email"]);
    assert_eq!(body["errors"][1]["code"], "invalid_email");
}

#[rstest]
#[actix_web::test]
async fn missing_fields_are_validation_errors() {
    let (status, body) = call(StatePorts::default(), register_request(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["code"], "invalid_length");
    assert_eq!(body["errors"][1]["code"], "required");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_conflict() {
    let mut ports = StatePorts::default();
    ports
        .registration
        .expect_register()
        .returning(|_| Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE)));

    let (status, body) = call(
        ports,
        register_request(json!({ "name": "Ann", "email": "ann@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn public_stats_are_wrapped_in_envelope() {
    let mut ports = StatePorts::default();
    ports.public_stats.expect_public_stats().returning(|| {
        Ok(PublicStats {
            total_users: 42,
            users_this_week: 7,
            users_today: 2,
        })
    });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/users/stats"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": { "total_users": 42, "users_this_week": 7, "users_today": 2 }
        })
    );
}

#[rstest]
fn origin_prefers_forwarded_address() {
    let req = actix_test::TestRequest::default()
        .insert_header(("x-forwarded-for", "198.51.100.4"))
        .peer_addr("203.0.113.9:5000".parse().expect("addr"))
        .to_http_request();

    let origin = request_origin(&req);

    assert_eq!(origin.ip_address.as_deref(), Some("198.51.100.4"));
    assert_eq!(origin.user_agent, None);
}
