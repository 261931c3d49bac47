#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging setup for the processor and its drivers.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once to
//! print them on stderr.

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;

/// Errors that can occur while installing the log subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level string is not one of trace, debug, info, warn, error
    #[error("Invalid log level `{0}` (expected trace, debug, info, warn or error)")]
    InvalidLevel(String),
    /// A global subscriber has already been installed
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Parse a case-insensitive level name.
pub fn parse_level(level: &str) -> Result<Level, LoggingError> {
    Level::from_str(level.trim()).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Install a stderr subscriber that shows events at `level` and above.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
