//! Incoming request view consumed by the page pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique request identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(format!("{nanos:x}-{seq:x}"))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracted route parameters (e.g., `:id` from `/products/:id`).
pub type RouteParams = HashMap<String, String>;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// The accept-header token that selects the JSON response branch.
const JSON_ACCEPT_TOKEN: &str = "application/json";

/// Immutable per-request view handed to the page orchestrator.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// Protocol scheme ("http" or "https").
    pub scheme: String,
    /// Request path.
    pub path: String,
    /// Extracted route parameters.
    pub params: RouteParams,
    /// Query string parameters.
    pub query: QueryParams,
    /// HTTP headers.
    pub headers: Headers,
}

impl PageRequest {
    /// Create a new request for the given scheme and path.
    pub fn new(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            scheme: scheme.into(),
            path: path.into(),
            params: HashMap::new(),
            query: HashMap::new(),
            headers: HashMap::new(),
        }
    }

    /// Add a route parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the client prefers a JSON response over rendered HTML.
    ///
    /// A plain substring check against the accept header, matching the
    /// hard-branch content negotiation of the pipeline.
    pub fn accepts_json(&self) -> bool {
        self.header("accept")
            .is_some_and(|accept| accept.contains(JSON_ACCEPT_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = PageRequest::new("https", "/products/1").with_header("Accept", "text/html");
        assert_eq!(req.header("accept"), Some("text/html"));
        assert_eq!(req.header("ACCEPT"), Some("text/html"));
    }

    #[test]
    fn test_accepts_json() {
        let html = PageRequest::new("https", "/").with_header("accept", "text/html,*/*");
        assert!(!html.accepts_json());

        let json = PageRequest::new("https", "/")
            .with_header("accept", "application/json, text/plain");
        assert!(json.accepts_json());

        let none = PageRequest::new("https", "/");
        assert!(!none.accepts_json());
    }

    #[test]
    fn test_params_and_query() {
        let req = PageRequest::new("http", "/products/42")
            .with_param("id", "42")
            .with_query("sort", "price");
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.query_param("sort"), Some("price"));
        assert_eq!(req.query_param("missing"), None);
    }
}
