//! HTTP request execution error types.
//!
//! This module classifies transport failures reported by reqwest into a small
//! set of variants so keyword callers can tell a timeout from a refused
//! connection without inspecting error strings themselves.

use thiserror::Error;

/// Errors that can occur during HTTP request execution.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection failures, DNS resolution errors and other network issues.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request did not complete within its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Certificate validation or handshake failure.
    #[error("TLS/SSL error: {0}")]
    TlsError(String),

    /// The request could not be built from the supplied parts
    /// (invalid header, unreadable client certificate, bad mime type).
    #[error("Request build error: {0}")]
    BuildError(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    BodyError(String),
}

/// Maps reqwest's error types to our variants.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::BuildError(message)
        } else if err.is_body() || err.is_decode() {
            RequestError::BodyError(message)
        } else if message.contains("certificate")
            || message.contains("TLS")
            || message.contains("SSL")
        {
            RequestError::TlsError(message)
        } else {
            RequestError::NetworkError(message)
        }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}
