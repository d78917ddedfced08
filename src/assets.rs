//! Static asset hosts and versioned URL assembly.

use std::collections::HashMap;

/// Asset hosting and versioning configuration.
///
/// Hosts are stored without scheme; URLs are assembled protocol-relative
/// (`//host/...`) so pages work under both http and https. Version maps
/// translate logical asset names to content-hashed file names when the
/// corresponding hash flag is set.
#[derive(Debug, Clone, Default)]
pub struct AssetSettings {
    /// Host serving general static files.
    pub static_host: String,
    /// Host serving JavaScript bundles.
    pub js_host: String,
    /// Host serving stylesheets.
    pub css_host: String,
    /// Substitute hashed css file names.
    pub use_css_hash: bool,
    /// Substitute hashed js file names.
    pub use_js_hash: bool,
    /// Serve minified js from the `min/` path.
    pub use_js_min: bool,
    /// Logical css name to hashed file name.
    pub css_versions: HashMap<String, String>,
    /// Logical js name to hashed file name.
    pub js_versions: HashMap<String, String>,
}

impl AssetSettings {
    /// Create settings with every host set to the same value.
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            static_host: host.clone(),
            js_host: host.clone(),
            css_host: host,
            ..Default::default()
        }
    }

    /// Set the js host.
    pub fn with_js_host(mut self, host: impl Into<String>) -> Self {
        self.js_host = host.into();
        self
    }

    /// Set the css host.
    pub fn with_css_host(mut self, host: impl Into<String>) -> Self {
        self.css_host = host.into();
        self
    }

    /// Enable hashed css names and register a version mapping.
    pub fn with_css_version(mut self, name: impl Into<String>, hashed: impl Into<String>) -> Self {
        self.use_css_hash = true;
        self.css_versions.insert(name.into(), hashed.into());
        self
    }

    /// Enable hashed js names and register a version mapping.
    pub fn with_js_version(mut self, name: impl Into<String>, hashed: impl Into<String>) -> Self {
        self.use_js_hash = true;
        self.js_versions.insert(name.into(), hashed.into());
        self
    }

    /// Serve minified js bundles.
    pub fn with_js_min(mut self, enabled: bool) -> Self {
        self.use_js_min = enabled;
        self
    }

    /// Protocol-relative static host prefix.
    pub fn static_host_url(&self) -> String {
        format!("//{}", self.static_host)
    }

    /// Protocol-relative js host prefix.
    pub fn js_host_url(&self) -> String {
        format!("//{}", self.js_host)
    }

    /// Protocol-relative css host prefix.
    pub fn css_host_url(&self) -> String {
        format!("//{}", self.css_host)
    }

    /// Resolve a css name through the version map when hashing is enabled.
    pub fn css_version(&self, name: &str) -> String {
        if self.use_css_hash {
            self.css_versions
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        }
    }

    /// Resolve a js name through the version map when hashing is enabled.
    pub fn js_version(&self, name: &str) -> String {
        if self.use_js_hash {
            self.js_versions
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        }
    }

    /// Full URL for a stylesheet.
    pub fn css_url(&self, name: &str) -> String {
        format!("{}/{}.css", self.css_host_url(), self.css_version(name))
    }

    /// Full URL for a js bundle, honoring the minification flag.
    pub fn js_url(&self, name: &str) -> String {
        if self.use_js_min {
            format!("{}/min/{}.js", self.js_host_url(), self.js_version(name))
        } else {
            format!("{}/{}.js", self.js_host_url(), self.js_version(name))
        }
    }
}
