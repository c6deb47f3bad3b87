//! Append-only `.npy` array files.
//!
//! Rows are appended along the leading axis without rewriting earlier
//! payload. Files are created with a header region large enough for any
//! 64-bit row count, so each append is a seek, a write and an in-place
//! rewrite of the shape field. The payload offset never moves.
//!
//! The element type and the trailing dimensions are fixed by the first
//! write. Later appends must match both; only the leading dimension grows.
//! Files produced by single-shot writers usually have no room for a longer
//! shape and are refused before anything is written.
//!
//! # Example
//!
//! ```rust
//! use appendnpy_store::{AppendableArray, ArrayView, read_array};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path().join("energy.npy");
//! let mut store = AppendableArray::open(&path)?;
//! for step in 0..3 {
//!     let energy = -100.0 - f64::from(step);
//!     store.append(&ArrayView::scalar(&energy))?;
//! }
//! store.close()?;
//!
//! let energies = read_array::<f64>(&path)?;
//! assert_eq!(energies.shape(), &[3]);
//! assert_eq!(energies.data(), &[-100.0, -101.0, -102.0]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

pub mod array;
pub mod config;
pub mod element;
pub mod error;
pub mod reader;
pub mod store;
pub mod validate;

pub use array::{ArrayView, NdArray};
pub use config::StoreConfig;
pub use element::Element;
pub use error::{ErrorKind, Result, StoreError};
pub use reader::{FileInfo, inspect, read_array, read_raw};
pub use store::AppendableArray;
pub use validate::{Established, validate};

/// Header codec re-exported for callers working with raw descriptors
pub use appendnpy_format as format;
pub use appendnpy_format::{DType, Header, StoredHeader, TypeKind};
