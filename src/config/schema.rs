//! Configuration schema for the keyword library.
//!
//! Defines the configuration structure and validation logic for the settings
//! a test suite can pass when importing the library.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest timeout accepted anywhere, in seconds (one year).
pub const MAX_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Library-wide settings.
///
/// Missing settings fall back to defaults. Timeouts are whole seconds,
/// at most [`MAX_TIMEOUT_SECS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryConfig {
    /// Default response timeout of the REST verb keywords. Defaults to 10.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default timeout of `Call Soap Method`. Defaults to 30.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_soap_timeout")]
    pub soap_timeout: u64,

    /// Timeout used when fetching a WSDL over HTTP. Defaults to 30.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_wsdl_timeout")]
    pub wsdl_timeout: u64,

    /// TLS verification of REST sessions created without an explicit
    /// `verify` argument. Defaults to false.
    ///
    /// SOAP clients never verify certificates.
    #[serde(default)]
    pub verify_ssl: bool,

    /// User-Agent sent by every session and client.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    10
}

fn default_soap_timeout() -> u64 {
    30
}

fn default_wsdl_timeout() -> u64 {
    30
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            soap_timeout: default_soap_timeout(),
            wsdl_timeout: default_wsdl_timeout(),
            verify_ssl: false,
            user_agent: None,
        }
    }
}

impl LibraryConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("timeout", self.timeout),
            ("soapTimeout", self.soap_timeout),
            ("wsdlTimeout", self.wsdl_timeout),
        ] {
            if value == 0 {
                return Err(format!("{} must be greater than 0", name));
            }
            if value > MAX_TIMEOUT_SECS {
                return Err(format!("{} must be at most {} seconds", name, MAX_TIMEOUT_SECS));
            }
        }
        if let Some(agent) = &self.user_agent {
            if agent.trim().is_empty() {
                return Err("userAgent must not be blank".to_string());
            }
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn soap_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.soap_timeout)
    }

    pub fn wsdl_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.wsdl_timeout)
    }
}
