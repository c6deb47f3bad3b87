//! Command-line configuration.
//!
//! Options can be given as flags or, where noted, through environment
//! variables (`APPENDNPY_LOG_FORMAT`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "appendnpy",
    about = "Inspect, check and concatenate appendable .npy files",
    version
)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log output format
    #[arg(
        long,
        global = true,
        env = "APPENDNPY_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show a file's element type, shape and header layout
    Info {
        /// File to inspect
        file: PathBuf,
    },

    /// Compare the declared payload with the bytes on disk
    ///
    /// Exits non-zero when they differ, which is what an interrupted append
    /// leaves behind.
    Check {
        /// File to check
        file: PathBuf,
    },

    /// Append the rows of every input to an appendable output file
    Concat {
        /// Output file, created if missing
        output: PathBuf,

        /// Input files, appended in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Skip syncing file data after each input
        #[arg(long)]
        no_sync: bool,
    },
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Parse arguments from the process command line.
    pub fn from_args() -> Self {
        Self::parse()
    }
}
