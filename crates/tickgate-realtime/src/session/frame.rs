//! Transport-neutral WebSocket frames.
//!
//! The pumps speak [`Frame`] so they run unchanged over axum's socket in
//! production and over plain channels in tests.

use bytes::Bytes;

use crate::message::Payload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(Payload),
    Binary(Bytes),
    Ping(Bytes),
    Pong(Bytes),
    Close,
}

impl Frame {
    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }
}
