#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! AutoService Configuration
//!
//! This crate provides configuration management for the registry processor.
//! It handles two sources:
//! - Processor options, passed by the host toolchain as `key[=value]` strings
//!   (`verify` enables the conformance check, `debug` enables note diagnostics)
//! - An optional TOML file holding the same options plus output and logging settings
//!
//! Options given on the command line override the values loaded from a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Option key enabling the conformance validator
pub const VERIFY_OPTION: &str = "verify";
/// Option key enabling note-level diagnostics
pub const DEBUG_OPTION: &str = "debug";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A processor option string was malformed
    #[error("Invalid processor option `{0}`: expected key or key=value")]
    InvalidOption(String),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Options controlling the processor's behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorOptions {
    /// Check that every implementer is a subtype of each interface it registers against
    pub verify: bool,
    /// Emit note-level diagnostics describing what the processor does
    pub debug: bool,
}

impl ProcessorOptions {
    /// Build options from host-supplied `(key, value)` pairs.
    ///
    /// `verify` is enabled only when its value is `true` (case-insensitive);
    /// `debug` is enabled by its mere presence. Unknown keys are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Self {
        let mut options = Self::default();
        options.apply(pairs);
        options
    }

    /// Override these options with host-supplied `(key, value)` pairs.
    pub fn apply<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) {
        for (key, value) in pairs {
            match key {
                VERIFY_OPTION => self.verify = value.is_some_and(|v| v.eq_ignore_ascii_case("true")),
                DEBUG_OPTION => self.debug = true,
                _ => {}
            }
        }
    }
}

/// Split a `key[=value]` option string into its parts.
///
/// ```
/// use autoservice_config::parse_option;
/// assert_eq!(parse_option("verify=true").unwrap(), ("verify", Some("true")));
/// assert_eq!(parse_option("debug").unwrap(), ("debug", None));
/// ```
pub fn parse_option(option: &str) -> Result<(&str, Option<&str>), ConfigError> {
    let (key, value) = match option.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (option.trim(), None),
    };
    if key.is_empty() {
        return Err(ConfigError::InvalidOption(option.to_string()));
    }
    Ok((key, value))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processor options
    pub processor: ProcessorOptions,
    /// Where registry resources are written
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the class output; registry resources go under `META-INF/services`
    pub class_output: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { class_output: Config::default_output_dir() } }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "warn".to_string() } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/autoservice/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("autoservice");
        Ok(config_dir.join("config.toml"))
    }

    /// Get the default class output directory
    pub fn default_output_dir() -> PathBuf {
        Self::default_output_dir_internal(
            std::env::var("OUT_DIR").ok(),
            std::env::current_dir().ok(),
        )
    }

    /// Internal function for testing - allows injection of environment values
    fn default_output_dir_internal(
        out_dir: Option<String>,
        current_dir: Option<PathBuf>,
    ) -> PathBuf {
        if let Some(out_dir) = out_dir {
            return PathBuf::from(out_dir);
        }

        if let Some(current_dir) = current_dir {
            return current_dir;
        }

        PathBuf::from(".")
    }
}
