//! Log subscriber setup

use crate::LogFormat;
use anyhow::{anyhow, Result};
use std::io;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, logging to stderr
///
/// `RUST_LOG` selects the filter (default `info`); `verbose` forces `debug`.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init(verbose: bool, format: LogFormat) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
