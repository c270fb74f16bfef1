//! HTTP response data models.
//!
//! [`HttpResponse`] is the raw exchange result produced by the executor;
//! [`KeywordResponse`] is the normalized value the REST keywords return.

use serde_json::Value;
use std::collections::HashMap;

/// Represents an HTTP response received from a server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Response headers. Names are lowercase; repeated headers are joined
    /// with `", "`.
    pub headers: HashMap<String, String>,

    /// Response body as raw bytes, already decompressed.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates an empty response with the given status code.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Gets a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Adds a header to the response. Repeated names are joined.
    pub fn add_header(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.headers.get_mut(&name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                self.headers.insert(name, value.to_string());
            }
        }
    }

    /// Sets the response body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}

/// Body of a normalized REST response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The payload was valid JSON.
    Json(Value),
    /// Anything else, byte for byte.
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// Decodes JSON when the bytes parse as JSON, otherwise keeps them raw.
    ///
    /// The Content-Type header is not consulted; an `application/json`
    /// response with a broken payload still comes back raw.
    pub fn decode(bytes: Vec<u8>) -> Self {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Raw(bytes),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Raw(bytes) => Some(bytes),
        }
    }
}

/// What the REST verb keywords hand back to the test: `{status, headers}` for
/// HEAD, `{status, headers, body}` for the other verbs.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<ResponseBody>,
}

impl KeywordResponse {
    /// Normalizes a HEAD response; the body is dropped.
    pub fn head(response: HttpResponse) -> Self {
        Self {
            status: response.status_code,
            headers: response.headers,
            body: None,
        }
    }

    /// Normalizes a response carrying a body.
    pub fn with_body(response: HttpResponse) -> Self {
        Self {
            status: response.status_code,
            headers: response.headers,
            body: Some(ResponseBody::decode(response.body)),
        }
    }

    /// Gets a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
