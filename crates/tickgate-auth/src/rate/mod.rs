//! Distributed sliding-window rate limiting.

pub mod key;
pub mod limiter;

pub use key::{RateLimitKey, normalize_route};
pub use limiter::{RateDecision, SlidingWindowLimiter};
