//! Configuration loading for the keyword library.
//!
//! Settings live under the `"http-keywords"` key of a JSON document, either
//! passed in directly or read from a file. The resulting [`LibraryConfig`] is
//! handed to [`HttpLibrary::with_config`](crate::HttpLibrary::with_config);
//! there is no process-wide configuration.

pub mod schema;

pub use schema::{LibraryConfig, MAX_TIMEOUT_SECS};

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Key under which the library's settings are stored.
pub const SETTINGS_KEY: &str = "http-keywords";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a JSON value.
///
/// Reads the settings under [`SETTINGS_KEY`]; a missing key or `None` yields
/// the defaults. Unlike unknown keys, malformed values are an error.
///
/// # Example
///
/// ```
/// use http_keywords::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "http-keywords": {
///         "timeout": 20,
///         "verifySsl": true
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 20);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<LibraryConfig, ConfigError> {
    let config = match settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        Some(settings) => serde_json::from_value::<LibraryConfig>(settings.clone())?,
        None => LibraryConfig::default(),
    };

    config.validate().map_err(ConfigError::Invalid)?;

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Loads configuration from a JSON file.
pub fn load_config_file(path: &Path) -> Result<LibraryConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content)?;
    load_config(Some(value))
}
