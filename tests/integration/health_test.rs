//! Integration tests for health endpoints.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert!(response.body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["hub_running"], true);
    assert_eq!(response.body["sessions"], 0);
    assert_eq!(response.body["rate_store"], "memory");
    assert_eq!(response.body["rate_store_reachable"], true);
}

#[tokio::test]
async fn test_detailed_health_reports_stopped_hub() {
    let app = helpers::TestApp::new().await;
    app.state.realtime.shutdown().await;

    let response = app.request("GET", "/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
    assert_eq!(response.body["hub_running"], false);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/health", None, Some("Bearer not-a-token"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}
