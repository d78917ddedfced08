//! Active user context and its per-request resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PageError;
use crate::request::PageRequest;

/// Per-request identity and session data.
///
/// Created once per request and owned by the orchestrator; exposed read-only
/// to the data source and, serialized, to the template variable set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// User identifier, absent for guests.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Whether the user is authenticated.
    pub authorized: bool,
    /// Additional session attributes, flattened into the serialized form.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserContext {
    /// Create an unauthenticated guest context.
    pub fn guest() -> Self {
        Self::default()
    }

    /// Create an authenticated context.
    pub fn authenticated(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            authorized: true,
            attributes: Map::new(),
        }
    }

    /// Add a session attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Serialize into a JSON object for the template variable set.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Resolves the active user for a request.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Resolve identity and session data for the given request.
    async fn resolve(&self, request: &PageRequest) -> Result<UserContext, PageError>;
}

/// Resolver that always yields a guest context.
///
/// Used by pages that never need user state but still want a serialized
/// user object in their variable set.
pub struct GuestResolver;

#[async_trait]
impl UserResolver for GuestResolver {
    async fn resolve(&self, _request: &PageRequest) -> Result<UserContext, PageError> {
        Ok(UserContext::guest())
    }
}
