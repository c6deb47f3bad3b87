//! Error types for the `.npy` header codec

use thiserror::Error;

/// Errors that can occur when parsing, building or rewriting `.npy` headers
#[derive(Debug, Error)]
pub enum FormatError {
    /// Magic bytes are not `\x93NUMPY`
    #[error("Invalid magic: expected '\\x93NUMPY', got {0:?}")]
    InvalidMagic([u8; 6]),

    /// Format version this codec does not understand
    #[error("Unsupported format version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version byte
        major: u8,
        /// Minor version byte
        minor: u8,
    },

    /// Data ended before the preamble or header region was complete
    #[error("Truncated header: expected {expected} bytes, got {actual} bytes")]
    TruncatedHeader {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Header text is not valid for its format version's encoding
    #[error("Header text is not valid {encoding}")]
    InvalidEncoding {
        /// Expected text encoding ("latin-1" or "utf-8")
        encoding: &'static str,
    },

    /// Header dictionary literal could not be parsed
    #[error("Invalid header at position {position}: {reason}")]
    InvalidHeader {
        /// Character offset inside the header text
        position: usize,
        /// What was wrong
        reason: String,
    },

    /// Header dictionary is missing a required key
    #[error("Header is missing key '{0}'")]
    MissingKey(&'static str),

    /// Header dictionary has a key outside descr/fortran_order/shape
    #[error("Header has unexpected key '{0}'")]
    UnexpectedKey(String),

    /// Type descriptor that is not a simple `<kind><size>` string
    #[error("Unsupported type descriptor: {0}")]
    UnsupportedDescr(String),

    /// Unpadded header text is longer than the reserved region
    #[error("Header needs {needed} bytes but only {reserved} are reserved")]
    HeaderOverflow {
        /// Bytes the encoded header needs, newline included
        needed: usize,
        /// Bytes available in the header region
        reserved: usize,
    },

    /// In-place shape rewrite does not fit the header region already on disk
    #[error(
        "Insufficient reserved header slack: shape needs {needed} bytes, header region holds {reserved}"
    )]
    InsufficientSlack {
        /// Bytes the rewritten header needs, newline included
        needed: usize,
        /// Header region length fixed at creation
        reserved: usize,
    },

    /// Header region too large for any supported format version
    #[error("Header length {0} exceeds the format limit")]
    HeaderTooLarge(usize),

    /// Element count or byte size does not fit in 64 bits
    #[error("Shape {0:?} overflows the addressable payload size")]
    ShapeOverflow(Vec<u64>),

    /// Payload length does not match the header's shape and dtype
    #[error("Payload size mismatch: header declares {expected} bytes, got {actual}")]
    PayloadSizeMismatch {
        /// Bytes declared by the header
        expected: u64,
        /// Bytes supplied
        actual: u64,
    },

    /// Binary read/write error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for FormatError {
    fn from(e: binrw::Error) -> Self {
        if let Some(inner) = e.custom_err::<Self>() {
            match inner {
                Self::InvalidMagic(magic) => return Self::InvalidMagic(*magic),
                Self::UnsupportedVersion { major, minor } => {
                    return Self::UnsupportedVersion {
                        major: *major,
                        minor: *minor,
                    };
                }
                _ => {}
            }
        }
        match e {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRead(other.to_string()),
        }
    }
}

impl FormatError {
    pub(crate) fn invalid_header(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            position,
            reason: reason.into(),
        }
    }
}

/// Result type alias for header codec operations
pub type Result<T> = std::result::Result<T, FormatError>;
