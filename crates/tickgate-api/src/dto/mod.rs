//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::BroadcastRequest;
pub use response::{
    BroadcastResponse, DetailedHealthResponse, ErrorBody, HealthResponse, RateLimitedBody,
};
