//! HTTP request data models.
//!
//! [`RequestOptions`] is what a keyword caller supplies; [`HttpRequest`] is the
//! fully resolved request handed to the executor.

use crate::config::MAX_TIMEOUT_SECS;
use crate::error::{KeywordError, Result};
use crate::rest::multipart::MultipartFile;
use std::time::Duration;

/// HTTP request method.
///
/// Only the verbs exposed as keywords are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::HEAD => "HEAD",
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }

    /// Whether the verb sends a text body (`data` is mandatory for these).
    pub fn requires_data(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::DELETE)
    }

    /// Whether the verb accepts query parameters.
    pub fn accepts_params(&self) -> bool {
        matches!(self, HttpMethod::HEAD | HttpMethod::GET)
    }

    /// Whether the verb accepts multipart file uploads.
    pub fn accepts_files(&self) -> bool {
        matches!(self, HttpMethod::POST)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request arguments of the REST verb keywords.
///
/// Which fields a verb accepts follows the keyword signatures: `params` for
/// HEAD and GET, `data` for POST, PUT and DELETE, `files` for POST only.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string parameters, in order.
    pub params: Vec<(String, String)>,

    /// Request headers. These replace session headers with the same name.
    pub headers: Vec<(String, String)>,

    /// Cookies sent with this request only.
    pub cookies: Vec<(String, String)>,

    /// Text body, sent UTF-8 encoded.
    pub data: Option<String>,

    /// Multipart uploads produced by
    /// [`convert_to_multipart_encoded_files`](crate::rest::multipart::convert_to_multipart_encoded_files).
    pub files: Vec<MultipartFile>,

    /// Response timeout. Falls back to the configured default when `None`.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn files(mut self, files: Vec<MultipartFile>) -> Self {
        self.files = files;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully resolved HTTP request, ready to be sent by the executor.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,

    /// Target URL.
    pub url: String,

    /// Query string parameters appended to the URL.
    pub query: Vec<(String, String)>,

    /// Request headers, applied over the session defaults.
    pub headers: Vec<(String, String)>,

    /// Raw request body.
    pub body: Option<Vec<u8>>,

    /// Files to send as a multipart form.
    pub files: Vec<MultipartFile>,

    /// Deadline for the whole exchange.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Creates a request with no headers, body or query parameters.
    pub fn new(method: HttpMethod, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            files: Vec::new(),
            timeout,
        }
    }

    /// Adds a header to the request.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets the request body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    /// Gets the value of a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Picks the call's timeout over the default and checks it is in range.
pub(crate) fn resolve_timeout(timeout: Option<Duration>, default: Duration) -> Result<Duration> {
    let timeout = timeout.unwrap_or(default);
    if timeout.is_zero() || timeout > Duration::from_secs(MAX_TIMEOUT_SECS) {
        return Err(KeywordError::invalid_argument(
            "timeout",
            format!("expected between 1 and {} seconds", MAX_TIMEOUT_SECS),
        ));
    }
    Ok(timeout)
}

/// Renders cookies as a single `Cookie` header value.
pub fn cookie_header(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
