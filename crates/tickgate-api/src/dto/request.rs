//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/broadcast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    /// Event type forwarded to clients as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Arbitrary event body.
    #[serde(default)]
    pub payload: serde_json::Value,
}
