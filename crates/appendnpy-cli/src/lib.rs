//! Command-line tools for appendable `.npy` files.
//!
//! - `info` shows a file's element type, shape and header layout
//! - `check` compares the declared payload with the bytes on disk
//! - `concat` appends the rows of several files to one appendable file
//!
//! The binary is a thin wrapper around [`run`].

#![warn(missing_docs)]

pub mod commands;
pub mod config;

pub use config::{Cli, Command, LogFormat};

use anyhow::Result;
use appendnpy_store::StoreConfig;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Logs go to
/// stderr so command output on stdout stays machine-readable.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Run the command selected by `cli`
///
/// Returns a failing exit code when `check` finds an inconsistent file.
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Info { file } => {
            commands::emit(&commands::info(&file)?, cli.json)?;
        }
        Command::Check { file } => {
            let report = commands::check(&file)?;
            commands::emit(&report, cli.json)?;
            if !report.consistent {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Concat {
            output,
            inputs,
            no_sync,
        } => {
            let config = StoreConfig::new().with_sync_on_append(!no_sync);
            commands::emit(&commands::concat(&output, &inputs, config)?, cli.json)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
