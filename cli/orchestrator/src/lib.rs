#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Building blocks for the `autoservice` command-line driver.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use analysis::Diagnostics;
use config::{parse_option, Config, ConfigError, ProcessorOptions};
use ir::SymbolTable;
use pipeline::{run_compilation, CompilationReport, FsFiler};
use registry::read_services;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while driving the processor from the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// The symbol table could not be loaded.
    #[error("Failed to load symbol table {path}: {message}")]
    Symbols {
        /// Symbol table file
        path: PathBuf,
        /// Loader error text
        message: String,
    },
    /// Configuration could not be loaded or an option string was malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The logging subscriber could not be installed.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// The interface name cannot name a registry resource.
    #[error("Invalid interface name: {0}")]
    InvalidInterface(String),
    /// A registry resource could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Resource path
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Load the configuration from `path`, or from the default location if a file exists there.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Ok(Config::from_file(path)?);
    }
    match Config::default_path() {
        Ok(default) if default.is_file() => {
            debug!("Loading config from {}", default.display());
            Ok(Config::from_file(default)?)
        }
        _ => Ok(Config::default()),
    }
}

/// Combine the configured processor options with `key[=value]` overrides.
pub fn resolve_options(config: &Config, overrides: &[String]) -> Result<ProcessorOptions> {
    let pairs = overrides.iter().map(|o| parse_option(o)).collect::<std::result::Result<Vec<_>, _>>()?;
    let mut options = config.processor;
    options.apply(pairs);
    Ok(options)
}

/// Run a full compilation over the symbol table at `symbols`, writing registries below `output`.
pub fn process(
    symbols: &Path,
    output: &Path,
    options: ProcessorOptions,
) -> Result<(CompilationReport, Diagnostics)> {
    let table = SymbolTable::from_file(symbols)
        .map_err(|e| CliError::Symbols { path: symbols.to_path_buf(), message: e.to_string() })?;
    for problem in table.validate() {
        warn!("{}: {}", symbols.display(), problem);
    }

    let mut filer = FsFiler::new(output);
    let mut diagnostics = Diagnostics::new();
    let report = run_compilation(&table, table.round_count(), &mut filer, &mut diagnostics, options);
    Ok((report, diagnostics))
}

/// Entries persisted for `interface` below `output`; empty when nothing was registered.
pub fn show(output: &Path, interface: &str) -> Result<Vec<String>> {
    path::validate_interface_name(interface).map_err(CliError::InvalidInterface)?;
    let file_path = path::services_file_path(output, interface);
    let file = match File::open(&file_path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(CliError::Io { path: file_path, source }),
    };
    let entries = read_services(file).map_err(|source| CliError::Io { path: file_path, source })?;
    Ok(entries.into_iter().collect())
}
