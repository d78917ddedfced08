//! Page data source interface.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::PageError;
use crate::request::PageRequest;
use crate::user::UserContext;

/// Fetches a page's primary data payload.
///
/// The fetch is gated on user resolution: the orchestrator never calls it
/// before the active user has settled (when the page requires one), so
/// implementations may rely on the user context being final. The payload is
/// merged into the variable set at the lowest precedence.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the primary data payload for the request.
    async fn fetch(&self, request: &PageRequest, user: &UserContext)
        -> Result<Value, PageError>;
}

/// Data source for pages without an API, yielding an empty payload.
pub struct EmptyData;

#[async_trait]
impl DataSource for EmptyData {
    async fn fetch(
        &self,
        _request: &PageRequest,
        _user: &UserContext,
    ) -> Result<Value, PageError> {
        Ok(Value::Object(Map::new()))
    }
}
