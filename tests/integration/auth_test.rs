//! Integration tests for bearer authentication on protected routes.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

use tickgate_auth::jwt::JwtEncoder;
use tickgate_core::config::ValidatorKind;
use tickgate_core::types::Principal;

use helpers::{DEV_TOKEN, TestApp, bearer};

const PROTECTED: &str = "/api/v1/users/profile";

fn principal() -> Principal {
    Principal {
        id: "user-42".to_string(),
        email: "trader@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_missing_header_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", PROTECTED, None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_malformed_headers_rejected() {
    let app = TestApp::new().await;

    for header in [
        "Basic dXNlcjpwYXNz",
        "Bearer",
        "Bearer ",
        "bearer valid-token",
        "Bearer valid-token extra",
        DEV_TOKEN,
    ] {
        let response = app.request("GET", PROTECTED, None, Some(header)).await;
        assert_eq!(
            response.status,
            StatusCode::UNAUTHORIZED,
            "header {header:?} should be rejected"
        );
        assert_eq!(response.body["error"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", PROTECTED, None, Some(&bearer("forged")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", PROTECTED, None, Some(&bearer(DEV_TOKEN)))
        .await;

    // No users service is configured, so the proxy answers 501.
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(response.body["error"], "Not implemented");
}

#[tokio::test]
async fn test_auth_routes_are_public() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(serde_json::json!({ "email": "a@b.c", "password": "x" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_jwt_round_trip() {
    let app = TestApp::with_config(|c| c.auth.validator = ValidatorKind::Jwt).await;
    let token = JwtEncoder::new(&app.state.config.auth)
        .issue(&principal(), Duration::minutes(5))
        .unwrap()
        .token;

    let response = app
        .request("GET", PROTECTED, None, Some(&bearer(&token)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_expired_jwt_rejected() {
    let app = TestApp::with_config(|c| c.auth.validator = ValidatorKind::Jwt).await;
    let token = JwtEncoder::new(&app.state.config.auth)
        .issue(&principal(), Duration::minutes(-5))
        .unwrap()
        .token;

    let response = app
        .request("GET", PROTECTED, None, Some(&bearer(&token)))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_jwt_with_other_secret_rejected() {
    let app = TestApp::with_config(|c| c.auth.validator = ValidatorKind::Jwt).await;
    let mut other = app.state.config.auth.clone();
    other.jwt_secret = "someone-else".to_string();
    let token = JwtEncoder::new(&other)
        .issue(&principal(), Duration::minutes(5))
        .unwrap()
        .token;

    let response = app
        .request("GET", PROTECTED, None, Some(&bearer(&token)))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_websocket_requires_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/v1/ws", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
