//! Error types for keyword execution.
//!
//! Every keyword returns [`Result`]. Errors are never retried or recovered
//! internally; they surface to the host test engine as keyword failures.

use crate::executor::RequestError;
use crate::xml::XmlError;
use thiserror::Error;

/// Result type alias for keyword operations.
pub type Result<T> = std::result::Result<T, KeywordError>;

/// Errors raised by the keyword library.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// No session or client registered under the alias.
    #[error("Non-existing index or alias '{0}'")]
    AliasNotFound(String),

    /// A file, WSDL resource or WSDL operation could not be found.
    #[error("{0}")]
    NotFound(String),

    /// The WSDL server was unreachable or did not answer with status 200.
    #[error("Server not found or resource '{url}' is not available: {reason}")]
    ConnectionFailure { url: String, reason: String },

    /// A SOAP message or response is neither well-formed XML nor usable text.
    #[error("{0}")]
    MalformedInput(String),

    /// Fault classification disagrees with the caller's expectation.
    #[error("{}", fault_mismatch_message(*expected_fault, *status))]
    FaultExpectationMismatch { expected_fault: bool, status: u16 },

    /// A keyword argument is missing or has an unusable value.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// The host engine asked for a keyword this library does not provide.
    #[error("No keyword with name '{0}' found")]
    UnknownKeyword(String),

    /// Transport failure passed through from the HTTP client, timeouts included.
    #[error(transparent)]
    Transport(#[from] RequestError),

    /// XML parsing or path lookup failed.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// Reading an input file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl KeywordError {
    pub(crate) fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        KeywordError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        KeywordError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the underlying transport gave up on the deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, KeywordError::Transport(RequestError::Timeout))
    }

    /// Returns `true` for every lookup failure (alias, file, WSDL resource).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            KeywordError::AliasNotFound(_) | KeywordError::NotFound(_)
        )
    }
}

fn fault_mismatch_message(expected_fault: bool, status: u16) -> String {
    if expected_fault {
        format!(
            "Expected the server to raise a fault, but it answered with status {}",
            status
        )
    } else {
        format!(
            "Expected a successful response, but the server raised a fault (status {})",
            status
        )
    }
}
