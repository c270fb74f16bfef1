//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host. [`init_logging`] is a convenience for hosts that have none.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,http_keywords=debug";

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish()
        .try_init()?;

    tracing::debug!("http-keywords logging initialized");
    Ok(())
}
