//! Integration tests for per-principal, per-route rate limiting.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;

use tickgate_cache::RateStoreManager;
use tickgate_core::config::FailurePolicy;
use tickgate_core::error::AppError;
use tickgate_core::result::AppResult;
use tickgate_core::traits::{RateStore, WindowEntry};

use helpers::{DEV_TOKEN, TestApp, bearer};

/// Store whose every call fails, as an unreachable Redis would.
#[derive(Debug)]
struct UnreachableStore;

#[async_trait]
impl RateStore for UnreachableStore {
    async fn slide(&self, _: &str, _: WindowEntry, _: Duration) -> AppResult<u64> {
        Err(AppError::cache("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }
}

async fn app_with_failing_store(policy: FailurePolicy) -> TestApp {
    let store = RateStoreManager::from_store(Arc::new(UnreachableStore));
    TestApp::with_store(Arc::new(store), "custom", |c| {
        c.rate_limit.failure_policy = policy;
    })
    .await
}

#[tokio::test]
async fn test_hundred_requests_then_limited() {
    let app = TestApp::new().await;
    let auth = bearer(DEV_TOKEN);

    for i in 0..100 {
        let response = app
            .request("GET", "/api/v1/users/profile", None, Some(&auth))
            .await;
        assert_ne!(
            response.status,
            StatusCode::TOO_MANY_REQUESTS,
            "request {i} should be admitted"
        );
    }

    let response = app
        .request("GET", "/api/v1/users/profile", None, Some(&auth))
        .await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.header("retry-after"), Some("60"));
    assert_eq!(response.body["error"], "Rate limit exceeded");
    assert_eq!(response.body["retry_after"], 60);
}

#[tokio::test]
async fn test_admitted_responses_carry_quota_headers() {
    let app = TestApp::with_config(|c| c.rate_limit.max_requests = 3).await;
    let auth = bearer(DEV_TOKEN);

    let first = app
        .request("GET", "/api/v1/watchlists", None, Some(&auth))
        .await;
    assert_eq!(first.header("x-ratelimit-limit"), Some("3"));
    assert_eq!(first.header("x-ratelimit-remaining"), Some("2"));

    let second = app
        .request("GET", "/api/v1/watchlists", None, Some(&auth))
        .await;
    assert_eq!(second.header("x-ratelimit-remaining"), Some("1"));
}

#[tokio::test]
async fn test_routes_are_limited_independently() {
    let app = TestApp::with_config(|c| c.rate_limit.max_requests = 2).await;
    let auth = bearer(DEV_TOKEN);

    for _ in 0..2 {
        app.request("GET", "/api/v1/alerts", None, Some(&auth)).await;
    }
    let limited = app.request("GET", "/api/v1/alerts", None, Some(&auth)).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);

    let other = app
        .request("GET", "/api/v1/dashboards", None, Some(&auth))
        .await;
    assert_eq!(other.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_parameterized_routes_share_a_window() {
    let app = TestApp::with_config(|c| c.rate_limit.max_requests = 2).await;
    let auth = bearer(DEV_TOKEN);

    app.request("GET", "/api/v1/alerts/a", None, Some(&auth)).await;
    app.request("GET", "/api/v1/alerts/b", None, Some(&auth)).await;
    let limited = app
        .request("GET", "/api/v1/alerts/c", None, Some(&auth))
        .await;

    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rejected_auth_does_not_consume_quota() {
    let app = TestApp::with_config(|c| c.rate_limit.max_requests = 1).await;

    for _ in 0..3 {
        let response = app
            .request("GET", "/api/v1/users/preferences", None, Some("Bearer nope"))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let response = app
        .request("GET", "/api/v1/users/preferences", None, Some(&bearer(DEV_TOKEN)))
        .await;
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let app = TestApp::with_config(|c| {
        c.rate_limit.enabled = false;
        c.rate_limit.max_requests = 1;
    })
    .await;
    let auth = bearer(DEV_TOKEN);

    for _ in 0..5 {
        let response = app
            .request("GET", "/api/v1/users/profile", None, Some(&auth))
            .await;
        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
        assert!(response.header("x-ratelimit-limit").is_none());
    }
}

#[tokio::test]
async fn test_store_failure_denies_by_default() {
    let app = app_with_failing_store(FailurePolicy::Deny).await;

    let response = app
        .request("GET", "/api/v1/watchlists", None, Some(&bearer(DEV_TOKEN)))
        .await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.header("retry-after"), Some("60"));
    assert_eq!(response.body["error"], "Rate limit exceeded");
    assert_eq!(response.body["retry_after"], 60);
}

#[tokio::test]
async fn test_store_failure_can_answer_unavailable() {
    let app = app_with_failing_store(FailurePolicy::Unavailable).await;

    let response = app
        .request("GET", "/api/v1/watchlists", None, Some(&bearer(DEV_TOKEN)))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "Rate limiter unavailable");
    assert!(response.header("retry-after").is_none());
}

#[tokio::test]
async fn test_store_failure_can_fail_open() {
    let app = app_with_failing_store(FailurePolicy::Allow).await;

    let response = app
        .request("GET", "/api/v1/watchlists", None, Some(&bearer(DEV_TOKEN)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert!(response.header("x-ratelimit-limit").is_none());
    assert!(response.header("x-ratelimit-remaining").is_none());
}
