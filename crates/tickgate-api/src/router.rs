//! Route definitions for the TickGate HTTP API.
//!
//! Domain routes live under `/api/v1`. Everything except the auth service
//! routes sits behind authentication and rate limiting; health checks
//! sit outside the API prefix.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(dashboard_routes())
        .merge(analytics_routes())
        .merge(user_routes())
        .merge(watchlist_routes())
        .merge(alert_routes())
        .merge(realtime_routes())
        // Layers run bottom-up: auth first, then the limiter.
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let api_v1 = Router::new().merge(auth_routes()).merge(protected);

    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1)
        .layer(RequestBodyLimitLayer::new(handlers::proxy::MAX_PROXY_BODY))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness probes
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Public auth service endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::proxy::auth))
        .route("/auth/register", post(handlers::proxy::auth))
        .route("/auth/refresh", post(handlers::proxy::auth))
}

/// Dashboard CRUD and sharing
fn dashboard_routes() -> Router<AppState> {
    use handlers::proxy::dashboards;
    Router::new()
        .route("/dashboards", get(dashboards).post(dashboards))
        .route(
            "/dashboards/{id}",
            get(dashboards).put(dashboards).delete(dashboards),
        )
        .route("/dashboards/{id}/share", post(dashboards))
}

/// Indicators and historical data
fn analytics_routes() -> Router<AppState> {
    use handlers::proxy::analytics;
    Router::new()
        .route("/analytics/indicators/{symbol}", get(analytics))
        .route("/analytics/calculate", post(analytics))
        .route("/analytics/historical/{symbol}", get(analytics))
}

/// Profile and preferences
fn user_routes() -> Router<AppState> {
    use handlers::proxy::users;
    Router::new()
        .route("/users/profile", get(users).put(users))
        .route("/users/preferences", get(users).put(users))
}

/// Watchlist CRUD
fn watchlist_routes() -> Router<AppState> {
    use handlers::proxy::watchlists;
    Router::new()
        .route("/watchlists", get(watchlists).post(watchlists))
        .route(
            "/watchlists/{id}",
            get(watchlists).put(watchlists).delete(watchlists),
        )
}

/// Alert CRUD
fn alert_routes() -> Router<AppState> {
    use handlers::proxy::alerts;
    Router::new()
        .route("/alerts", get(alerts).post(alerts))
        .route("/alerts/{id}", get(alerts).put(alerts).delete(alerts))
}

/// WebSocket upgrade and broadcast ingress
fn realtime_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(handlers::ws::ws_upgrade))
        .route("/broadcast", post(handlers::broadcast::broadcast))
}
