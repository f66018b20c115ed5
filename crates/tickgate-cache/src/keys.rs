//! Key builders for everything TickGate writes to the shared store.
//!
//! Centralising key construction keeps every gateway instance agreeing on
//! the same layout. The store's own `key_prefix` is applied on top.

/// Key of the sliding-window log for one principal on one route.
///
/// `route` is expected to be normalized already.
pub fn rate_limit(prefix: &str, principal_id: &str, route: &str) -> String {
    format!("{prefix}{principal_id}:{route}")
}
