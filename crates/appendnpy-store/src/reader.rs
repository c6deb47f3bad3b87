//! Loading and inspecting array files

use crate::array::NdArray;
use crate::element::Element;
use crate::{Result, StoreError};
use appendnpy_format::{Header, StoredHeader};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load a file's header and exactly its declared payload bytes
///
/// Bytes past the declared payload are ignored; they can only come from an
/// append that was interrupted before its header rewrite.
///
/// # Errors
///
/// - [`StoreError::Format`] if the header cannot be parsed
/// - [`StoreError::PayloadTruncated`] if the file is shorter than declared
pub fn read_raw(path: impl AsRef<Path>) -> Result<(Header, Vec<u8>)> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let stored = StoredHeader::read_from(&mut file)?;

    let expected = stored.header.payload_size()?;
    let mut payload = Vec::new();
    file.take(expected).read_to_end(&mut payload)?;
    if (payload.len() as u64) < expected {
        return Err(StoreError::PayloadTruncated {
            expected,
            actual: payload.len() as u64,
        });
    }

    debug!("Read {} with shape {:?}", path.display(), stored.header.shape);
    Ok((stored.header, payload))
}

/// Load a whole array file as elements of type `T`
///
/// # Errors
///
/// - [`StoreError::DtypeMismatch`] if the file's descriptor is not `T`'s
/// - [`StoreError::FortranOrder`] for column-major files
/// - [`StoreError::PayloadTruncated`] if the file is shorter than declared
pub fn read_array<T: Element>(path: impl AsRef<Path>) -> Result<NdArray<T>> {
    let (header, payload) = read_raw(path)?;

    if header.dtype != T::dtype() {
        return Err(StoreError::DtypeMismatch {
            expected: header.dtype,
            found: T::dtype(),
        });
    }
    if header.fortran_order {
        return Err(StoreError::FortranOrder);
    }

    NdArray::new(header.shape, T::decode(&payload))
}

/// Summary of an array file's header and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Header and its on-disk layout
    pub stored: StoredHeader,
    /// Payload size implied by the header
    pub declared_payload: u64,
    /// Bytes actually present after the header region
    pub physical_payload: u64,
    /// Whether the header region can hold any 64-bit row count
    pub appendable: bool,
}

impl FileInfo {
    /// Bytes missing from the declared payload
    pub const fn missing_bytes(&self) -> u64 {
        self.declared_payload.saturating_sub(self.physical_payload)
    }

    /// Bytes present past the declared payload
    pub const fn trailing_bytes(&self) -> u64 {
        self.physical_payload.saturating_sub(self.declared_payload)
    }

    /// Whether the payload on disk is exactly what the header declares
    pub const fn is_consistent(&self) -> bool {
        self.declared_payload == self.physical_payload
    }
}

/// Read a file's header and compare its declared and physical payload
///
/// # Errors
///
/// Returns [`StoreError::Format`] if the header cannot be parsed.
pub fn inspect(path: impl AsRef<Path>) -> Result<FileInfo> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let stored = StoredHeader::read_from(&mut file)?;

    Ok(FileInfo {
        declared_payload: stored.header.payload_size()?,
        physical_payload: len.saturating_sub(stored.payload_offset()),
        appendable: stored.can_grow(),
        stored,
    })
}
