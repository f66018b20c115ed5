//! # tickgate-auth
//!
//! The admission side of the gateway: turning an `Authorization` header
//! into [`Claims`](tickgate_core::types::Claims) and deciding whether a
//! principal may make another call on a route.
//!
//! - [`gate`]: strict `Bearer <token>` parsing and validation
//! - [`jwt`]: HS256 token decoding and minting
//! - [`validator`]: validator selection, including the static development validator
//! - [`rate`]: the distributed sliding-window limiter

pub mod gate;
pub mod jwt;
pub mod rate;
pub mod validator;

pub use gate::AuthGate;
pub use rate::{RateDecision, RateLimitKey, SlidingWindowLimiter};
