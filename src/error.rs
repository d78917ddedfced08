//! Error types for the page pipeline.

use thiserror::Error;

/// Failure raised by any stage of the page pipeline.
///
/// Every variant maps to a response status through [`PageError::status_code`];
/// stages that know a more specific status attach it with
/// [`PageError::with_status`].
#[derive(Error, Debug)]
pub enum PageError {
    /// Failure carrying an explicit response status.
    #[error("{message}")]
    Status {
        /// HTTP status to set on the response.
        code: u16,
        /// Human-readable failure description.
        message: String,
        /// Captured trace text, shown in diagnostic mode.
        trace: Option<String>,
    },

    /// User context resolution failed.
    #[error("User resolution error: {0}")]
    User(String),

    /// Data source fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Locale resolution failed.
    #[error("Locale error: {0}")]
    Locale(String),

    /// Template variable assembly failed.
    #[error("Template vars error: {0}")]
    Vars(String),

    /// A configured template could not be resolved by the store.
    #[error("Template not found: {0}")]
    TemplateMissing(String),

    /// A template function raised while rendering.
    #[error("Render error: {0}")]
    Render(String),

    /// Opaque collaborator failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PageError {
    /// Create a failure with an explicit response status.
    pub fn with_status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
            trace: None,
        }
    }

    /// Attach trace text to a status failure. No-op for other variants.
    pub fn with_trace(self, trace: impl Into<String>) -> Self {
        match self {
            Self::Status { code, message, .. } => Self::Status {
                code,
                message,
                trace: Some(trace.into()),
            },
            other => other,
        }
    }

    /// The response status for this failure. Defaults to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { code, .. } => *code,
            _ => 500,
        }
    }

    /// Captured trace text, if any.
    pub fn trace(&self) -> Option<&str> {
        match self {
            Self::Status { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }
}
