//! WSDL loading and SOAPAction lookup.
//!
//! The WSDL is kept as raw text on the client; it is only ever consulted to
//! find the `soapAction` of an operation.

use crate::error::{KeywordError, Result};
use crate::models::request::resolve_timeout;
use crate::xml::{NamespaceMode, XmlElement};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Whether `location` names a URL rather than a filesystem path.
///
/// Single-letter schemes are Windows drive letters (`C:\service.wsdl`).
pub fn is_url(location: &str) -> bool {
    match url::Url::parse(location) {
        Ok(url) => url.scheme().len() > 1,
        Err(_) => false,
    }
}

/// Loads WSDL text from a URL or a file.
///
/// # Errors
///
/// `KeywordError::ConnectionFailure` when the server is unreachable or does
/// not answer 200; `KeywordError::NotFound` when the file does not exist.
pub fn load_wsdl(client: &Client, location: &str, timeout: Duration) -> Result<String> {
    if is_url(location) {
        fetch_wsdl(client, location, timeout)
    } else {
        read_wsdl(Path::new(location))
    }
}

fn fetch_wsdl(client: &Client, url: &str, timeout: Duration) -> Result<String> {
    tracing::debug!(url, "fetching WSDL");
    let connection_failure = |reason: String| KeywordError::ConnectionFailure {
        url: url.to_string(),
        reason,
    };

    let timeout = resolve_timeout(None, timeout)?;
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .map_err(|e| connection_failure(e.to_string()))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(connection_failure(format!("status {}", status.as_u16())));
    }

    let bytes = response
        .bytes()
        .map_err(|e| connection_failure(e.to_string()))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| KeywordError::MalformedInput(format!("WSDL '{}' is not valid UTF-8", url)))
}

fn read_wsdl(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(KeywordError::NotFound(format!(
            "File '{}' not found",
            path.display()
        )));
    }
    fs::read_to_string(path).map_err(|e| KeywordError::io(path.display().to_string(), e))
}

/// Finds the `soapAction` declared for `method` in a WSDL document.
///
/// Looks for an element whose `name` is `method` and reads `soapAction` from
/// its `operation` child, ignoring namespace prefixes. When several elements
/// carry the name, the first with a `soapAction` wins; an operation without
/// the attribute yields an empty action.
///
/// # Errors
///
/// `KeywordError::Xml` when the WSDL is not well-formed and
/// `KeywordError::NotFound` when no element named `method` has an
/// `operation` child.
pub fn soap_action(wsdl: &str, method: &str) -> Result<String> {
    let root = XmlElement::parse_with(wsdl, NamespaceMode::Strip)?;
    let operations: Vec<&XmlElement> = root
        .descendants()
        .into_iter()
        .filter(|element| element.attribute("name") == Some(method))
        .flat_map(|element| &element.children)
        .filter(|child| child.local_name() == "operation")
        .collect();

    if operations.is_empty() {
        return Err(KeywordError::NotFound(format!(
            "Operation '{}' not found in WSDL",
            method
        )));
    }

    Ok(operations
        .iter()
        .find_map(|op| op.attribute("soapAction"))
        .unwrap_or("")
        .to_string())
}
