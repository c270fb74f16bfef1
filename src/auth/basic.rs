//! Basic HTTP authentication (RFC 7617).
//!
//! REST sessions carry their credentials as a default `Authorization` header
//! built here, so every request made through the session is authenticated.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Username/password pair of a REST session.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        basic_auth(&self.username, &self.password)
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Encodes username and password into a Basic authentication header value.
///
/// # Examples
///
/// ```
/// use http_keywords::auth::basic::basic_auth;
///
/// let auth_header = basic_auth("user", "pass123");
/// assert_eq!(auth_header, "Basic dXNlcjpwYXNzMTIz");
/// ```
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = STANDARD.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}
