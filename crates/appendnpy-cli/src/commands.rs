//! Command implementations
//!
//! Each command returns a serialisable report. Text output comes from the
//! report's `Display` impl and JSON output from `serde_json`.

use anyhow::{Context, Result, bail};
use appendnpy_store::{AppendableArray, FileInfo, StoreConfig, inspect, read_raw};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Header and payload summary of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoReport {
    /// File inspected
    pub path: PathBuf,
    /// Element type descriptor, e.g. `<f8`
    pub descr: String,
    /// Column-major payload
    pub fortran_order: bool,
    /// Full shape
    pub shape: Vec<u64>,
    /// Format version as `major.minor`
    pub version: String,
    /// Length of the header region
    pub header_length: usize,
    /// Offset of the first payload byte
    pub payload_offset: u64,
    /// Payload bytes declared by the header
    pub declared_payload: u64,
    /// Payload bytes present on disk
    pub physical_payload: u64,
    /// Header can hold any 64-bit row count
    pub appendable: bool,
}

impl InfoReport {
    fn from_info(path: &Path, info: &FileInfo) -> Self {
        let stored = &info.stored;
        Self {
            path: path.to_path_buf(),
            descr: stored.header.dtype.to_string(),
            fortran_order: stored.header.fortran_order,
            shape: stored.header.shape.clone(),
            version: format!("{}.{}", stored.version.major(), stored.version.minor()),
            header_length: stored.header_length,
            payload_offset: stored.payload_offset(),
            declared_payload: info.declared_payload,
            physical_payload: info.physical_payload,
            appendable: info.appendable,
        }
    }
}

impl fmt::Display for InfoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.path.display())?;
        writeln!(f, "  descr:          {}", self.descr)?;
        writeln!(f, "  shape:          {:?}", self.shape)?;
        writeln!(f, "  fortran_order:  {}", self.fortran_order)?;
        writeln!(f, "  version:        {}", self.version)?;
        writeln!(f, "  header length:  {}", self.header_length)?;
        writeln!(f, "  payload offset: {}", self.payload_offset)?;
        writeln!(
            f,
            "  payload:        {} declared, {} on disk",
            self.declared_payload, self.physical_payload
        )?;
        write!(f, "  appendable:     {}", if self.appendable { "yes" } else { "no" })
    }
}

/// Outcome of comparing declared and physical payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// File checked
    pub path: PathBuf,
    /// Payload bytes declared by the header
    pub declared_payload: u64,
    /// Payload bytes present on disk
    pub physical_payload: u64,
    /// Declared bytes absent from the file
    pub missing_bytes: u64,
    /// Bytes past the declared payload
    pub trailing_bytes: u64,
    /// Declared and physical payload agree
    pub consistent: bool,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        if self.consistent {
            write!(f, "{path}: ok ({} payload bytes)", self.declared_payload)
        } else if self.missing_bytes > 0 {
            write!(
                f,
                "{path}: truncated, {} of {} payload bytes missing",
                self.missing_bytes, self.declared_payload
            )
        } else {
            write!(f, "{path}: {} bytes past the declared payload", self.trailing_bytes)
        }
    }
}

/// Result of a concatenation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcatReport {
    /// File appended to
    pub output: PathBuf,
    /// Number of inputs appended
    pub inputs: usize,
    /// Rows appended across all inputs
    pub rows_appended: u64,
    /// Shape of the output afterwards
    pub shape: Vec<u64>,
}

impl fmt::Display for ConcatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: appended {} rows from {} files, shape is now {:?}",
            self.output.display(),
            self.rows_appended,
            self.inputs,
            self.shape
        )
    }
}

/// Describe a file
pub fn info(path: &Path) -> Result<InfoReport> {
    let info = inspect(path).with_context(|| format!("Failed to inspect {}", path.display()))?;
    Ok(InfoReport::from_info(path, &info))
}

/// Compare a file's declared payload with its length on disk
pub fn check(path: &Path) -> Result<CheckReport> {
    let info = inspect(path).with_context(|| format!("Failed to inspect {}", path.display()))?;
    if !info.is_consistent() {
        warn!(
            "{}: declared {} payload bytes, found {}",
            path.display(),
            info.declared_payload,
            info.physical_payload
        );
    }
    Ok(CheckReport {
        path: path.to_path_buf(),
        declared_payload: info.declared_payload,
        physical_payload: info.physical_payload,
        missing_bytes: info.missing_bytes(),
        trailing_bytes: info.trailing_bytes(),
        consistent: info.is_consistent(),
    })
}

/// Append the rows of each input to `output`, in order
///
/// Inputs are appended one at a time; a failure leaves the rows of earlier
/// inputs in place.
pub fn concat(output: &Path, inputs: &[PathBuf], config: StoreConfig) -> Result<ConcatReport> {
    let mut store = AppendableArray::open_with_config(output, config)
        .with_context(|| format!("Failed to open {}", output.display()))?;

    let mut rows_appended = 0u64;
    for input in inputs {
        let (header, payload) =
            read_raw(input).with_context(|| format!("Failed to read {}", input.display()))?;
        if header.fortran_order {
            bail!("{} is Fortran-ordered and cannot be appended", input.display());
        }
        store
            .append_raw(header.dtype, &header.shape, &payload)
            .with_context(|| {
                format!("Failed to append {} to {}", input.display(), output.display())
            })?;
        let rows = header.leading_dim().unwrap_or(0);
        rows_appended += rows;
        info!("Appended {} rows from {}", rows, input.display());
    }

    let shape = store.shape().map(<[u64]>::to_vec).unwrap_or_default();
    store.close()?;

    Ok(ConcatReport {
        output: output.to_path_buf(),
        inputs: inputs.len(),
        rows_appended,
        shape,
    })
}

/// Print `report` as text or pretty JSON
pub fn emit<T: Serialize + fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
