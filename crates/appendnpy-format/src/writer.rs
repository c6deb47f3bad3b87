//! One-shot writers for complete `.npy` files

use crate::error::{FormatError, Result};
use crate::header::{Header, StoredHeader};
use std::io::Write;

fn write_with<W: Write>(
    writer: &mut W,
    stored: StoredHeader,
    payload: &[u8],
) -> Result<StoredHeader> {
    let expected = stored.header.payload_size()?;
    if expected != payload.len() as u64 {
        return Err(FormatError::PayloadSizeMismatch {
            expected,
            actual: payload.len() as u64,
        });
    }

    stored.write_to(writer)?;
    writer.write_all(payload)?;
    Ok(stored)
}

/// Write a file whose header is sized to `header`'s shape only
///
/// This is what a generic single-shot writer produces. The result is a
/// valid `.npy` file but its header has no room for the leading dimension
/// to grow, so it cannot be appended to.
pub fn write_exact<W: Write>(
    writer: &mut W,
    header: Header,
    payload: &[u8],
) -> Result<StoredHeader> {
    write_with(writer, StoredHeader::exact(header)?, payload)
}

/// Write a file laid out for in-place growth of the leading dimension
pub fn write_appendable<W: Write>(
    writer: &mut W,
    header: Header,
    payload: &[u8],
) -> Result<StoredHeader> {
    write_with(writer, StoredHeader::create(header)?, payload)
}
