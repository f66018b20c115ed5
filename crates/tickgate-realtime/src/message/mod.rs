//! Messages delivered to sessions.

pub mod envelope;

pub use envelope::Envelope;

/// Serialized message as queued for every recipient.
///
/// One allocation is shared by all sessions a broadcast reaches.
pub type Payload = std::sync::Arc<str>;
