//! Rate limit keys.

use std::fmt;

/// Collapse duplicate slashes and drop a trailing slash.
///
/// The root path stays `/`.
pub fn normalize_route(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Principal plus normalized route; each key has its own window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    principal_id: String,
    route: String,
}

impl RateLimitKey {
    /// Build a key from a matched route template when the router
    /// provides one, falling back to the raw request path.
    pub fn new(principal_id: impl Into<String>, matched: Option<&str>, path: &str) -> Self {
        let route = match matched {
            Some(template) => template.to_string(),
            None => normalize_route(path),
        };
        Self {
            principal_id: principal_id.into(),
            route,
        }
    }

    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Key used in the shared store.
    pub fn storage_key(&self, prefix: &str) -> String {
        tickgate_cache::keys::rate_limit(prefix, &self.principal_id, &self.route)
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.principal_id, self.route)
    }
}
