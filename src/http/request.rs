/// Represents a parsed HTTP request from a client.
///
/// Parsing never fails: fields missing from a malformed request line are
/// left as empty strings, and the request is routed like any other (it will
/// usually end up as a 404).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// The request method as sent (e.g. "GET"); not validated
    pub method: String,
    /// The raw request target (e.g. "/echo/abc"), not percent-decoded
    pub target: String,
    /// HTTP version token (typically "HTTP/1.1"), not validated
    pub version: String,
    /// Header lines in the order they were received
    pub headers: Vec<(String, String)>,
    /// Request body, if a Content-Length was declared
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: String,
    target: String,
    version: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            target: self.target,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// If the header was sent more than once, the first occurrence wins.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// The `User-Agent` header, if the client sent one.
    pub fn user_agent(&self) -> Option<&str> {
        self.header("User-Agent")
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}
