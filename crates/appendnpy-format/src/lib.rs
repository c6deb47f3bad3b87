//! Parser and builder for the NumPy `.npy` header
//!
#![allow(clippy::cast_possible_truncation)] // Header lengths are bounded by the version's length field
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::missing_const_for_fn)] // Future mutability
//! A `.npy` file is a fixed preamble (magic, version, header length), a
//! header region holding a Python dict literal that describes the element
//! type and shape, and the raw row-major payload.
//!
//! This crate treats the header region as a fixed byte budget. Files laid
//! out with [`StoredHeader::create`] reserve enough padding that the
//! leading dimension can grow to any 64-bit value and be rewritten in place
//! with [`StoredHeader::rewrite_shape_in_place`], so the payload offset
//! never moves and appending rows never rewrites earlier payload bytes.
//!
//! # Layout
//!
//! ```text
//! 0x00  \x93NUMPY
//! 0x06  major, minor
//! 0x08  header length (u16 LE for 1.0, u32 LE for 2.0/3.0)
//! 0x0A  {'descr': '<f8', 'fortran_order': False, 'shape': (10,), }   ...   \n
//!       payload
//! ```
//!
//! # Usage
//!
//! ```rust
//! use appendnpy_format::{DType, Header, StoredHeader};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let header = Header::new(DType::parse("<f8")?, vec![10]);
//! let mut stored = StoredHeader::create(header)?;
//! let mut file = Cursor::new(stored.to_bytes()?);
//!
//! stored.rewrite_shape_in_place(&mut file, vec![1_000_000])?;
//!
//! let parsed = StoredHeader::parse(file.get_ref())?;
//! assert_eq!(parsed.header.shape, vec![1_000_000]);
//! assert_eq!(parsed.payload_offset(), stored.payload_offset());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod dtype;
pub mod error;
pub mod header;
pub mod parser;
pub mod preamble;
pub mod writer;

pub use dtype::{ByteOrder, DType, TypeKind};
pub use error::{FormatError, Result};
pub use header::{Header, StoredHeader};
pub use preamble::{Preamble, Version};
pub use writer::{write_appendable, write_exact};

/// Magic bytes at the start of every `.npy` file
pub const MAGIC: [u8; 6] = *b"\x93NUMPY";

/// Alignment of the payload offset for files this crate creates
pub const ARRAY_ALIGN: usize = 64;

/// Alignment used by older single-shot writers
pub const LEGACY_ALIGN: usize = 16;

/// Common format trait for symmetric parse/build support
pub trait NpyFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
