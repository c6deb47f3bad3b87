//! Fixed-size preamble: magic, version and header length
//!
//! | Offset | Size   | Field |
//! |--------|--------|-------|
//! | 0x00   | 6      | Magic `\x93NUMPY` |
//! | 0x06   | 1      | Major version |
//! | 0x07   | 1      | Minor version |
//! | 0x08   | 2 or 4 | Header length, little-endian (2 bytes for 1.0, 4 for 2.0 and 3.0) |

use crate::MAGIC;
use crate::error::FormatError;
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

/// Smallest preamble (version 1.0)
pub const MIN_PREAMBLE_SIZE: usize = 10;

/// Largest preamble (versions 2.0 and 3.0)
pub const MAX_PREAMBLE_SIZE: usize = 12;

/// Format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    /// 1.0: 2-byte header length, latin-1 header text
    V1_0,
    /// 2.0: 4-byte header length, latin-1 header text
    V2_0,
    /// 3.0: 4-byte header length, utf-8 header text
    V3_0,
}

impl Version {
    /// Map version bytes to a known version
    pub const fn from_bytes(major: u8, minor: u8) -> Option<Self> {
        match (major, minor) {
            (1, 0) => Some(Self::V1_0),
            (2, 0) => Some(Self::V2_0),
            (3, 0) => Some(Self::V3_0),
            _ => None,
        }
    }

    /// Major version byte
    pub const fn major(self) -> u8 {
        match self {
            Self::V1_0 => 1,
            Self::V2_0 => 2,
            Self::V3_0 => 3,
        }
    }

    /// Minor version byte
    pub const fn minor(self) -> u8 {
        0
    }

    /// Size of the preamble for this version
    pub const fn preamble_size(self) -> usize {
        match self {
            Self::V1_0 => MIN_PREAMBLE_SIZE,
            Self::V2_0 | Self::V3_0 => MAX_PREAMBLE_SIZE,
        }
    }

    /// Largest header length the length field can express
    pub const fn max_header_length(self) -> usize {
        match self {
            Self::V1_0 => u16::MAX as usize,
            Self::V2_0 | Self::V3_0 => u32::MAX as usize,
        }
    }

    /// Whether header text is utf-8 rather than latin-1
    pub const fn is_utf8(self) -> bool {
        matches!(self, Self::V3_0)
    }
}

/// Parsed preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    /// Format version
    pub version: Version,
    /// Length of the header region that follows the preamble
    pub header_length: usize,
}

impl BinRead for Preamble {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(binrw::Error::Custom {
                pos: 0,
                err: Box::new(FormatError::InvalidMagic(magic)),
            });
        }

        let mut buf2 = [0u8; 2];
        reader.read_exact(&mut buf2)?;
        let [major, minor] = buf2;
        let version = Version::from_bytes(major, minor).ok_or_else(|| binrw::Error::Custom {
            pos: 6,
            err: Box::new(FormatError::UnsupportedVersion { major, minor }),
        })?;

        let header_length = match version {
            Version::V1_0 => {
                reader.read_exact(&mut buf2)?;
                u16::from_le_bytes(buf2) as usize
            }
            Version::V2_0 | Version::V3_0 => {
                let mut buf4 = [0u8; 4];
                reader.read_exact(&mut buf4)?;
                u32::from_le_bytes(buf4) as usize
            }
        };

        Ok(Self {
            version,
            header_length,
        })
    }
}

impl BinWrite for Preamble {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        if self.header_length > self.version.max_header_length() {
            return Err(binrw::Error::Custom {
                pos: 8,
                err: Box::new(FormatError::HeaderTooLarge(self.header_length)),
            });
        }

        writer.write_all(&MAGIC)?;
        writer.write_all(&[self.version.major(), self.version.minor()])?;
        match self.version {
            Version::V1_0 => writer.write_all(&(self.header_length as u16).to_le_bytes())?,
            Version::V2_0 | Version::V3_0 => {
                writer.write_all(&(self.header_length as u32).to_le_bytes())?;
            }
        }
        Ok(())
    }
}
