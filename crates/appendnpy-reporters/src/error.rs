//! Error types for reporters

use appendnpy_store::StoreError;
use thiserror::Error;

/// Result type for reporter operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while configuring or running a reporter.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing the report to its file failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A report interval of zero steps was requested.
    #[error("Report interval must be at least one step")]
    InvalidInterval,

    /// The simulation state lacks a quantity the reporter asked for.
    #[error("Simulation state has no {0}")]
    MissingQuantity(&'static str),
}
