//! Validated identity records produced by the auth gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated identity attached to a request or session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier as issued by the auth service.
    pub id: String,
    /// Email address of the principal.
    pub email: String,
}

/// A validated, time-bounded assertion of a principal's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier.
    pub principal_id: String,
    /// Principal email.
    pub email: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// Instant after which the claims must no longer be honored.
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// The principal these claims describe.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.principal_id.clone(),
            email: self.email.clone(),
        }
    }

    /// Whether the claims are expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the claims are expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left until expiry, zero once expired.
    pub fn remaining(&self) -> std::time::Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}
