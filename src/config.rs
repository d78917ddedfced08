//! Page behavior flags.

/// Boolean toggles controlling a page's lifecycle behavior.
#[derive(Debug, Clone, Copy)]
pub struct PageFlags {
    /// Resolve the active user before fetching data.
    pub need_active_user: bool,
    /// Render a status-matched error page on failure.
    pub show_error_page: bool,
    /// Diagnostic mode: send raw error text and trace instead of an error
    /// page. Must never be enabled in production.
    pub test_server: bool,
}

impl Default for PageFlags {
    fn default() -> Self {
        Self {
            need_active_user: true,
            show_error_page: true,
            test_server: false,
        }
    }
}

impl PageFlags {
    /// Create flags with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the active user is resolved before the data fetch.
    pub fn with_active_user(mut self, enabled: bool) -> Self {
        self.need_active_user = enabled;
        self
    }

    /// Set whether error pages are rendered on failure.
    pub fn with_error_page(mut self, enabled: bool) -> Self {
        self.show_error_page = enabled;
        self
    }

    /// Enable or disable diagnostic mode.
    pub fn with_test_server(mut self, enabled: bool) -> Self {
        self.test_server = enabled;
        self
    }
}
