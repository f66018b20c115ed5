//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use tickgate_api::{AppState, build_router};
use tickgate_auth::AuthGate;
use tickgate_auth::validator::build_validator;
use tickgate_cache::memory::MemoryRateStore;
use tickgate_core::config::{AppConfig, ValidatorKind};
use tickgate_core::traits::RateStore;
use tickgate_realtime::RealtimeEngine;

/// Token accepted by the static validator.
pub const DEV_TOKEN: &str = "valid-token";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// Process-wide shutdown token
    pub root: CancellationToken,
}

impl TestApp {
    /// Static validator, in-memory store, any origin.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`] with `tweak` applied to the configuration.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        Self::with_store(Arc::new(MemoryRateStore::new()), "memory", tweak).await
    }

    /// Like [`TestApp::with_config`] counting against `store`.
    pub async fn with_store(
        store: Arc<dyn RateStore>,
        store_name: &'static str,
        tweak: impl FnOnce(&mut AppConfig),
    ) -> Self {
        let mut config = AppConfig::default();
        config.auth.validator = ValidatorKind::Static;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.realtime.allowed_origins = vec!["*".to_string()];
        tweak(&mut config);
        let config = Arc::new(config);

        let root = CancellationToken::new();
        let gate = AuthGate::new(build_validator(&config.auth));
        let realtime = Arc::new(RealtimeEngine::start(config.realtime.clone(), root.clone()));
        let state = AppState::new(
            Arc::clone(&config),
            gate,
            store,
            store_name,
            realtime,
        )
        .expect("Failed to build state");

        Self {
            router: build_router(state.clone()),
            state,
            root,
        }
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Serve the router on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let router = self.router.clone();
        let cancel = self.root.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { cancel.cancelled().await })
                .await
                .expect("Server failed");
        });
        addr
    }

    /// Poll until the hub reports `expected` sessions.
    pub async fn wait_for_sessions(&self, expected: usize) {
        let hub = self.state.realtime.hub().clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            loop {
                let snapshot = hub.snapshot().await.expect("Hub stopped");
                if snapshot.len() == expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("Hub never reached {expected} sessions"));
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// `Bearer <token>`
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// A header value as a string, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
