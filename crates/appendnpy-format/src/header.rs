//! Header dictionary and its on-disk region
//!
//! [`Header`] is the `{descr, fortran_order, shape}` record. [`StoredHeader`]
//! adds the version and the header-region length that surround it on disk.
//!
//! The header region length is chosen once, when a file is created, and is
//! treated as a fixed byte budget afterwards. [`StoredHeader::create`]
//! reserves enough room for the leading dimension to reach `u64::MAX`, so
//! the shape can be rewritten in place for any realistic number of appends
//! while the payload offset stays put.

use crate::dtype::DType;
use crate::error::{FormatError, Result};
use crate::parser;
use crate::preamble::{MAX_PREAMBLE_SIZE, MIN_PREAMBLE_SIZE, Preamble, Version};
use crate::{ARRAY_ALIGN, LEGACY_ALIGN};
use binrw::{BinRead, BinWrite};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// The header dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Element type
    pub dtype: DType,
    /// Column-major payload when true
    pub fortran_order: bool,
    /// Dimensions, leading axis first
    pub shape: Vec<u64>,
}

impl Header {
    /// Create a row-major header
    pub fn new(dtype: DType, shape: Vec<u64>) -> Self {
        Self {
            dtype,
            fortran_order: false,
            shape,
        }
    }

    /// Same header with a different leading dimension
    ///
    /// A zero-dimensional header is returned unchanged.
    #[must_use]
    pub fn with_leading_dim(&self, rows: u64) -> Self {
        let mut header = self.clone();
        if let Some(first) = header.shape.first_mut() {
            *first = rows;
        }
        header
    }

    /// Leading dimension, if the array has at least one axis
    pub fn leading_dim(&self) -> Option<u64> {
        self.shape.first().copied()
    }

    /// All dimensions except the leading one
    pub fn trailing_shape(&self) -> &[u64] {
        self.shape.get(1..).unwrap_or(&[])
    }

    /// Number of elements described by the shape
    pub fn element_count(&self) -> Result<u64> {
        self.shape
            .iter()
            .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| FormatError::ShapeOverflow(self.shape.clone()))
    }

    /// Payload size in bytes
    pub fn payload_size(&self) -> Result<u64> {
        self.element_count()?
            .checked_mul(self.dtype.item_size() as u64)
            .ok_or_else(|| FormatError::ShapeOverflow(self.shape.clone()))
    }

    /// Canonical dictionary text, without padding or newline
    pub fn to_text(&self) -> String {
        format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.dtype,
            if self.fortran_order { "True" } else { "False" },
            shape_text(&self.shape)
        )
    }

    /// Bytes needed for the unpadded text plus the terminating newline
    pub fn encoded_len(&self) -> usize {
        self.to_text().len() + 1
    }

    /// Encode the header region padded to exactly `reserved_length` bytes
    pub fn encode_region(&self, reserved_length: usize) -> Result<Vec<u8>> {
        let text = self.to_text();
        let needed = text.len() + 1;
        if needed > reserved_length {
            return Err(FormatError::HeaderOverflow {
                needed,
                reserved: reserved_length,
            });
        }

        let mut region = Vec::with_capacity(reserved_length);
        region.extend_from_slice(text.as_bytes());
        region.resize(reserved_length - 1, b' ');
        region.push(b'\n');
        Ok(region)
    }

    /// Parse dictionary text
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse(text)
    }
}

fn shape_text(shape: &[u64]) -> String {
    match shape {
        [] => "()".to_string(),
        [only] => format!("({only},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(u64::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Pick the smallest version whose length field can hold a region of at
/// least `needed` bytes, with preamble + region rounded up to `align`.
fn layout_for(needed: usize, align: usize) -> Result<(Version, usize)> {
    for version in [Version::V1_0, Version::V2_0] {
        let prefix = version.preamble_size();
        let total = (prefix + needed).next_multiple_of(align);
        let header_length = total - prefix;
        if header_length <= version.max_header_length() {
            return Ok((version, header_length));
        }
    }
    Err(FormatError::HeaderTooLarge(needed))
}

/// A header together with the region layout it occupies on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredHeader {
    /// The header dictionary
    pub header: Header,
    /// Format version written in the preamble
    pub version: Version,
    /// Length of the header region; fixed for the life of the file
    pub header_length: usize,
}

impl StoredHeader {
    /// Lay out a new header with growth slack for the leading dimension
    ///
    /// The region is sized as if the leading dimension were `u64::MAX`, then
    /// padded so the payload starts on a 64-byte boundary.
    pub fn create(header: Header) -> Result<Self> {
        let needed = header.with_leading_dim(u64::MAX).encoded_len();
        let (version, header_length) = layout_for(needed, ARRAY_ALIGN)?;
        Ok(Self {
            header,
            version,
            header_length,
        })
    }

    /// Lay out a header sized to its current shape, with no growth slack
    ///
    /// Only the 16-byte alignment padding of older writers is added.
    pub fn exact(header: Header) -> Result<Self> {
        let (version, header_length) = layout_for(header.encoded_len(), LEGACY_ALIGN)?;
        Ok(Self {
            header,
            version,
            header_length,
        })
    }

    /// Preamble size for this header's version
    pub const fn preamble_size(&self) -> usize {
        self.version.preamble_size()
    }

    /// Offset of the first payload byte
    pub const fn payload_offset(&self) -> u64 {
        (self.preamble_size() + self.header_length) as u64
    }

    /// Offset one past the last declared payload byte
    pub fn payload_end(&self) -> Result<u64> {
        self.payload_offset()
            .checked_add(self.header.payload_size()?)
            .ok_or_else(|| FormatError::ShapeOverflow(self.header.shape.clone()))
    }

    /// Whether the region can hold the header with `rows` leading rows
    pub fn fits_leading_dim(&self, rows: u64) -> bool {
        self.header.with_leading_dim(rows).encoded_len() <= self.header_length
    }

    /// Whether the region has room for any 64-bit leading dimension
    ///
    /// True for every file laid out by [`StoredHeader::create`]. Files from
    /// single-shot writers generally fail this check.
    pub fn can_grow(&self) -> bool {
        !self.header.shape.is_empty() && self.fits_leading_dim(u64::MAX)
    }

    /// Bytes of padding left in the region for the current shape
    pub fn slack(&self) -> usize {
        self.header_length.saturating_sub(self.header.encoded_len())
    }

    /// Serialise preamble and padded region
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let region = self.header.encode_region(self.header_length)?;
        let mut buffer = Vec::with_capacity(self.preamble_size() + region.len());
        let mut cursor = Cursor::new(&mut buffer);
        Preamble {
            version: self.version,
            header_length: self.header_length,
        }
        .write_options(&mut cursor, binrw::Endian::Little, ())
        .map_err(FormatError::from)?;
        cursor.write_all(&region)?;
        Ok(buffer)
    }

    /// Write preamble and region at the writer's current position
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Parse preamble and header region from the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(data))
    }

    /// Read preamble and header region at the reader's current position
    ///
    /// On success the reader is left at the first payload byte.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let start = reader.stream_position()?;

        let mut prefix = Vec::with_capacity(MAX_PREAMBLE_SIZE);
        reader
            .by_ref()
            .take(MAX_PREAMBLE_SIZE as u64)
            .read_to_end(&mut prefix)?;
        if prefix.len() < MIN_PREAMBLE_SIZE {
            return Err(FormatError::TruncatedHeader {
                expected: MIN_PREAMBLE_SIZE,
                actual: prefix.len(),
            });
        }

        let preamble = Preamble::read_options(
            &mut Cursor::new(prefix.as_slice()),
            binrw::Endian::Little,
            (),
        )
        .map_err(|e| match FormatError::from(e) {
            FormatError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                FormatError::TruncatedHeader {
                    expected: MAX_PREAMBLE_SIZE,
                    actual: prefix.len(),
                }
            }
            other => other,
        })?;

        let prefix_size = preamble.version.preamble_size();
        reader.seek(SeekFrom::Start(start + prefix_size as u64))?;

        let mut region = Vec::with_capacity(preamble.header_length);
        reader
            .by_ref()
            .take(preamble.header_length as u64)
            .read_to_end(&mut region)?;
        if region.len() < preamble.header_length {
            return Err(FormatError::TruncatedHeader {
                expected: prefix_size + preamble.header_length,
                actual: prefix_size + region.len(),
            });
        }

        let text = if preamble.version.is_utf8() {
            String::from_utf8(region)
                .map_err(|_| FormatError::InvalidEncoding { encoding: "utf-8" })?
        } else {
            region.iter().map(|&b| char::from(b)).collect()
        };

        Ok(Self {
            header: Header::parse(&text)?,
            version: preamble.version,
            header_length: preamble.header_length,
        })
    }

    /// Rewrite the header in place with a new shape
    ///
    /// The region keeps its length; only the shape text and its padding
    /// change. Fails with [`FormatError::InsufficientSlack`] when the new
    /// shape does not fit, in which case nothing is written. Payload bytes
    /// are never touched.
    pub fn rewrite_shape_in_place<W: Write + Seek>(
        &mut self,
        writer: &mut W,
        new_shape: Vec<u64>,
    ) -> Result<()> {
        let updated = Self {
            header: Header {
                shape: new_shape,
                ..self.header.clone()
            },
            version: self.version,
            header_length: self.header_length,
        };

        let bytes = updated.to_bytes().map_err(|e| match e {
            FormatError::HeaderOverflow { needed, reserved } => {
                FormatError::InsufficientSlack { needed, reserved }
            }
            other => other,
        })?;

        writer.seek(SeekFrom::Start(0))?;
        writer.write_all(&bytes)?;
        *self = updated;
        Ok(())
    }
}

impl crate::NpyFormat for StoredHeader {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.to_bytes()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}
