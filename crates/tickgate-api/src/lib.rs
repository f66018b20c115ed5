//! # tickgate-api
//!
//! HTTP API layer for TickGate built on Axum.
//!
//! Provides the `/api/v1` route table, the auth and rate-limit middleware
//! in front of protected routes, the WebSocket upgrade, the broadcast
//! ingress, and the proxy to domain services.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod upstream;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
