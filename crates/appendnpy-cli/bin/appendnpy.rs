//! `appendnpy` binary entry point.
//!
//! Parses arguments, initializes logging and runs the selected command.
//! For library usage, see the appendnpy-cli crate documentation.

use anyhow::Result;
use appendnpy_cli::Cli;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::from_args();
    appendnpy_cli::init_logging(cli.log_format);

    tracing::debug!("Running {:?}", cli.command);
    appendnpy_cli::run(cli)
}
