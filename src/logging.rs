//! Structured logging with page context.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// A structured log entry.
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    level: LogLevel,
    message: &'a str,
    /// Page name for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<&'a str>,
    /// Request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
    /// Microseconds since logger creation.
    elapsed_us: u64,
}

impl LogEntry<'_> {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.to_string())
    }

    fn to_human(&self) -> String {
        let mut s = format!("[{}]", self.level);
        if let Some(page) = self.page {
            s.push_str(&format!(" {}:", page));
        }
        s.push_str(&format!(" {} ({}us)", self.message, self.elapsed_us));
        s
    }
}

/// Structured logger scoped to a page and, optionally, a request.
#[derive(Debug, Clone)]
pub struct PageLogger {
    page: Option<String>,
    request_id: Option<String>,
    start: Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl PageLogger {
    /// Create a new logger.
    pub fn new() -> Self {
        Self {
            page: None,
            request_id: None,
            start: Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Set the page name.
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Set the request ID.
    pub fn with_request(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message,
            page: self.page.as_deref(),
            request_id: self.request_id.as_deref(),
            elapsed_us: self.start.elapsed().as_micros() as u64,
        };

        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        eprintln!("{}", output);
    }
}

impl Default for PageLogger {
    fn default() -> Self {
        Self::new()
    }
}
