//! AutoService command-line driver
//!
//! Runs the registry processor over a JSON symbol table the way a host
//! compiler would, and inspects the registry files it produces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use autoservice_cli::{load_config, process, resolve_options, show, CliError};
use clap::{Parser, Subcommand};
use registry::ProviderRegistryReader;

/// Command-line interface configuration for autoservice.
#[derive(Parser, Debug)]
#[command(
    name = "autoservice",
    about = "Generate META-INF/services provider registries from marked declarations",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Available autoservice commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a symbol table and merge its registrations into registry files
    Process {
        /// Symbol table JSON file
        #[arg(long)]
        symbols: PathBuf,
        /// Class output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Config file (defaults to the user config, if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Processor option, e.g. `-A verify=true` or `-A debug`
        #[arg(short = 'A', value_name = "KEY[=VALUE]")]
        options: Vec<String>,
    },
    /// Print the implementers registered for one interface
    Show {
        /// Class output directory
        #[arg(long)]
        output: PathBuf,
        /// Provider interface binary name
        interface: String,
    },
}

fn main() {
    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded without error diagnostics.
fn run(cli: Cli) -> Result<bool, CliError> {
    match cli.cmd {
        Commands::Process { symbols, output, config, options } => {
            let config = load_config(config.as_deref())?;
            logging::init(cli.log_level.as_deref().unwrap_or(&config.logging.level))?;

            let options = resolve_options(&config, &options)?;
            let output = output.unwrap_or_else(|| config.output.class_output.clone());
            let (report, diagnostics) = process(&symbols, &output, options)?;

            for diagnostic in diagnostics.entries() {
                eprintln!("{}", diagnostic);
            }
            for interface in report.written() {
                println!("wrote {}", path::services_file_path(&output, interface).display());
            }
            println!(
                "{} interfaces, {} registry files written",
                report.registry.interface_count(),
                report.written().len()
            );
            Ok(!diagnostics.has_errors())
        }
        Commands::Show { output, interface } => {
            logging::init(cli.log_level.as_deref().unwrap_or("warn"))?;
            for implementer in show(&output, &interface)? {
                println!("{}", implementer);
            }
            Ok(true)
        }
    }
}
