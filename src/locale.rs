//! Localized variable resolution.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::PageError;
use crate::request::PageRequest;

/// Resolves localized strings for a request.
///
/// Runs concurrently with template variable building once the data fetch has
/// settled; results sit between the data payload and page variables in merge
/// precedence.
#[async_trait]
pub trait LocaleResolver: Send + Sync {
    /// Produce the localized variables for the given request.
    async fn resolve(&self, request: &PageRequest) -> Result<Map<String, Value>, PageError>;
}

/// In-memory locale resolver with a fixed variable set.
#[derive(Debug, Clone, Default)]
pub struct StaticLocales {
    vars: Map<String, Value>,
}

impl StaticLocales {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a localized variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), Value::String(value.into()));
        self
    }
}

#[async_trait]
impl LocaleResolver for StaticLocales {
    async fn resolve(&self, _request: &PageRequest) -> Result<Map<String, Value>, PageError> {
        Ok(self.vars.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_locales() {
        let locales = StaticLocales::new()
            .with_var("greeting", "Hallo")
            .with_var("farewell", "Tschüss");
        let req = PageRequest::new("https", "/");
        let vars = locales.resolve(&req).await.unwrap();
        assert_eq!(vars["greeting"], Value::String("Hallo".to_string()));
        assert_eq!(vars.len(), 2);
    }
}
