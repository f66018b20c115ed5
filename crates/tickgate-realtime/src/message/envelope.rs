//! Message envelope for events pushed to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tickgate_core::result::AppResult;

use super::Payload;

/// `{"type": ..., "payload": ..., "timestamp": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event type, e.g. `price_update`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Event body, passed through untouched.
    pub payload: serde_json::Value,
    /// When the gateway accepted the event.
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    /// Stamp an event with the current time.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Serialize once for fan-out.
    pub fn encode(&self) -> AppResult<Payload> {
        Ok(serde_json::to_string(self)?.into())
    }
}
