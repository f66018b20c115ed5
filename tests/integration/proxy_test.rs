//! Integration tests for forwarding domain routes to upstream services.

mod helpers;

use std::net::SocketAddr;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::{Value, json};

use helpers::{DEV_TOKEN, TestApp, bearer};

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        [("etag", "\"v1\""), ("x-internal", "secret")],
        Json(json!({
            "method": method.as_str(),
            "path": uri.to_string(),
            "user_id": header("x-user-id"),
            "user_email": header("x-user-email"),
            "authorization": header("authorization"),
            "body": body,
        })),
    )
}

async fn spawn_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().fallback(echo)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_unconfigured_service_not_implemented() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/v1/dashboards/abc", None, Some(&bearer(DEV_TOKEN)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(response.body, json!({ "error": "Not implemented" }));
}

#[tokio::test]
async fn test_forwards_identity_and_body() {
    let upstream = spawn_upstream().await;
    let app = TestApp::with_config(|c| {
        c.upstreams.watchlists = Some(format!("http://{upstream}/"));
    })
    .await;

    let response = app
        .request(
            "POST",
            "/api/v1/watchlists?sort=name",
            Some(json!({ "name": "tech", "symbols": ["AAPL", "MSFT"] })),
            Some(&bearer(DEV_TOKEN)),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.header("etag"), Some("\"v1\""));
    assert!(response.header("x-internal").is_none());
    assert_eq!(response.body["method"], "POST");
    assert_eq!(response.body["path"], "/api/v1/watchlists?sort=name");
    assert_eq!(response.body["user_id"], "user-123");
    assert_eq!(response.body["user_email"], "user@example.com");
    assert_eq!(response.body["authorization"], Value::Null);
    assert_eq!(response.body["body"]["symbols"][1], "MSFT");
}

#[tokio::test]
async fn test_public_route_forwards_without_identity() {
    let upstream = spawn_upstream().await;
    let app = TestApp::with_config(|c| {
        c.upstreams.auth = Some(format!("http://{upstream}"));
    })
    .await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(json!({ "refresh_token": "r" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["path"], "/api/v1/auth/refresh");
    assert_eq!(response.body["user_id"], Value::Null);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let app = TestApp::with_config(|c| {
        c.upstreams.alerts = Some("http://127.0.0.1:1".to_string());
    })
    .await;

    let response = app
        .request("GET", "/api/v1/alerts", None, Some(&bearer(DEV_TOKEN)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"].is_string());
}
