//! Template variable set assembly and merging.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::assets::AssetSettings;
use crate::error::PageError;
use crate::request::PageRequest;

/// Variable set key holding the serialized user context.
pub const ACTIVE_USER_KEY: &str = "activeUser";

/// The merged mapping passed to template functions.
///
/// Built exactly once per request by merging, in precedence order: data
/// payload, locale variables, page template variables, and finally the
/// serialized user context. Immutable once handed to rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars(Map<String, Value>);

impl TemplateVars {
    /// Create an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single variable, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Get a variable by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Shallow-merge an object into the set; incoming keys win.
    pub fn merge_object(&mut self, object: Map<String, Value>) {
        for (key, value) in object {
            self.0.insert(key, value);
        }
    }

    /// Deep-merge the serialized user context under [`ACTIVE_USER_KEY`].
    ///
    /// Applied last during assembly, so user fields win over any
    /// `activeUser` entry contributed by earlier layers.
    pub fn merge_user(&mut self, user: Value) {
        match self.0.get_mut(ACTIVE_USER_KEY) {
            Some(existing) => deep_merge(existing, user),
            None => {
                self.0.insert(ACTIVE_USER_KEY.to_string(), user);
            }
        }
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize the whole set for the JSON response branch.
    pub fn to_json_string(&self) -> Result<String, PageError> {
        serde_json::to_string(&self.0).map_err(|err| PageError::Vars(err.to_string()))
    }
}

/// Recursively merge `incoming` into `target`; non-object values replace.
fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

/// Builds page-specific template variables.
///
/// The injected strategy replacing per-page subclassing: pages that need
/// extra variables supply their own implementation; everything else uses
/// [`DefaultVarsBuilder`].
#[async_trait]
pub trait VarsBuilder: Send + Sync {
    /// Produce the page-specific variables for the given request.
    async fn build(&self, request: &PageRequest) -> Result<Map<String, Value>, PageError>;
}

/// Default page variables: request query, stylesheet list, and asset hosts.
#[derive(Debug, Clone, Default)]
pub struct DefaultVarsBuilder {
    assets: AssetSettings,
    css: Vec<String>,
}

impl DefaultVarsBuilder {
    /// Create a builder over the given asset settings.
    pub fn new(assets: AssetSettings) -> Self {
        Self {
            assets,
            css: Vec::new(),
        }
    }

    /// Add a stylesheet (by logical name) to the page's css list.
    pub fn with_css(mut self, name: impl Into<String>) -> Self {
        self.css.push(name.into());
        self
    }
}

#[async_trait]
impl VarsBuilder for DefaultVarsBuilder {
    async fn build(&self, request: &PageRequest) -> Result<Map<String, Value>, PageError> {
        let css: Vec<String> = self.css.iter().map(|name| self.assets.css_url(name)).collect();
        let mut vars = Map::new();
        vars.insert("request".to_string(), json!({ "get": request.query }));
        vars.insert("css".to_string(), json!(css));
        vars.insert(
            "hosts".to_string(),
            json!({
                "staticJs": self.assets.js_host_url(),
                "staticCss": self.assets.css_host_url(),
            }),
        );
        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_merge_precedence() {
        let mut vars = TemplateVars::new();
        let mut first = Map::new();
        first.insert("title".to_string(), json!("from data"));
        first.insert("only_data".to_string(), json!(1));
        let mut second = Map::new();
        second.insert("title".to_string(), json!("from locale"));
        vars.merge_object(first);
        vars.merge_object(second);
        assert_eq!(vars.get("title"), Some(&json!("from locale")));
        assert_eq!(vars.get("only_data"), Some(&json!(1)));
    }

    #[test]
    fn test_user_merges_last_and_wins() {
        let mut vars = TemplateVars::new();
        let mut data = Map::new();
        data.insert(
            ACTIVE_USER_KEY.to_string(),
            json!({ "name": "stale", "avatar": "x.png" }),
        );
        vars.merge_object(data);
        vars.merge_user(json!({ "name": "Ada", "authorized": true }));
        assert_eq!(
            vars.get(ACTIVE_USER_KEY),
            Some(&json!({ "name": "Ada", "avatar": "x.png", "authorized": true }))
        );
    }

    #[test]
    fn test_user_inserted_when_absent() {
        let mut vars = TemplateVars::new();
        vars.merge_user(json!({ "authorized": false }));
        assert_eq!(vars.get(ACTIVE_USER_KEY), Some(&json!({ "authorized": false })));
    }

    #[tokio::test]
    async fn test_default_vars_builder() {
        let assets = AssetSettings::new("cdn.example.com");
        let builder = DefaultVarsBuilder::new(assets).with_css("main");
        let req = PageRequest::new("https", "/").with_query("q", "shoes");
        let vars = builder.build(&req).await.unwrap();
        assert_eq!(vars["request"]["get"]["q"], json!("shoes"));
        assert_eq!(vars["css"], json!(["//cdn.example.com/main.css"]));
        assert_eq!(vars["hosts"]["staticCss"], json!("//cdn.example.com"));
    }
}
