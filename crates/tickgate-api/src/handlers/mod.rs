//! Request handlers grouped by concern.

pub mod broadcast;
pub mod health;
pub mod proxy;
pub mod ws;
