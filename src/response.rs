//! Response assembly and the exactly-one-send terminal.

/// Default content type for rendered pages.
const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// A fully assembled page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl PageResponse {
    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }
}

/// Terminal writer for a page request.
///
/// Consumes itself on [`send`](ResponseWriter::send), so a pipeline holding a
/// writer can produce at most one response. Stamps the no-store cache policy
/// and the charset-qualified content type on every send.
#[derive(Debug)]
pub struct ResponseWriter {
    status: u16,
    content_type: String,
}

impl ResponseWriter {
    /// Create a writer with status 200 and the default content type.
    pub fn new() -> Self {
        Self {
            status: 200,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Set the response status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Override the content type (without charset suffix).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Send the body, producing the final response.
    pub fn send(self, body: impl Into<String>) -> PageResponse {
        PageResponse {
            status: self.status,
            headers: vec![
                ("Cache-Control".to_string(), "no-cache, no-store".to_string()),
                (
                    "Content-Type".to_string(),
                    format!("{}; charset=utf-8", self.content_type),
                ),
            ],
            body: body.into(),
        }
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}
