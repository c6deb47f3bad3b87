//! Error types for the array store

use appendnpy_format::{DType, FormatError};
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Broad category of a [`StoreError`]
///
/// Callers that only care whether the element type, the values or the
/// file itself was at fault can match on this instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file is not a readable `.npy` file
    Format,
    /// The element type does not match the file
    Type,
    /// Shape, size or header capacity is wrong
    Value,
    /// Underlying I/O failure
    Io,
}

/// Errors that can occur while opening, appending to or reading an array file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file is not a parseable `.npy` file.
    #[error("Invalid .npy file: {0}")]
    Format(FormatError),

    /// Incoming element type differs from the file's.
    #[error("Element type mismatch: file holds {expected}, array is {found}")]
    DtypeMismatch {
        /// Element type recorded in the file
        expected: DType,
        /// Element type of the incoming array
        found: DType,
    },

    /// Incoming trailing dimensions differ from the file's.
    #[error("Shape mismatch: file rows have shape {expected:?}, array rows have shape {found:?}")]
    ShapeMismatch {
        /// Trailing dimensions recorded in the file
        expected: Vec<u64>,
        /// Trailing dimensions of the incoming array
        found: Vec<u64>,
    },

    /// The header region has no room for a growing leading dimension.
    #[error(
        "Header region of {header_length} bytes cannot grow ({required} bytes needed); file was not created for appending"
    )]
    InsufficientHeaderSlack {
        /// Length of the header region on disk
        header_length: usize,
        /// Region length a growable header would need
        required: usize,
    },

    /// The leading dimension or payload size would exceed 64 bits.
    #[error("Row count overflow: {current} rows + {incoming} rows")]
    RowCountOverflow {
        /// Rows already in the file
        current: u64,
        /// Rows being appended
        incoming: u64,
    },

    /// Zero-dimensional arrays have no axis to append along.
    #[error("Zero-dimensional arrays cannot be appended")]
    ZeroDimensional,

    /// Column-major files are not supported.
    #[error("Fortran-ordered files are not supported")]
    FortranOrder,

    /// The payload on disk is shorter than the header declares.
    #[error("Payload truncated: expected {expected} bytes, found {actual}")]
    PayloadTruncated {
        /// Declared payload size
        expected: u64,
        /// Bytes actually present
        actual: u64,
    },

    /// Array data does not match its shape.
    #[error("Invalid array: {0}")]
    InvalidArray(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::DtypeMismatch { .. } => ErrorKind::Type,
            Self::ShapeMismatch { .. }
            | Self::InsufficientHeaderSlack { .. }
            | Self::RowCountOverflow { .. }
            | Self::ZeroDimensional
            | Self::FortranOrder
            | Self::PayloadTruncated { .. }
            | Self::InvalidArray(_) => ErrorKind::Value,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<FormatError> for StoreError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Io(e) => Self::Io(e),
            FormatError::InsufficientSlack { needed, reserved } => Self::InsufficientHeaderSlack {
                header_length: reserved,
                required: needed,
            },
            other => Self::Format(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use appendnpy_format::TypeKind;

    #[test]
    fn test_error_categories() {
        let dtype = StoreError::DtypeMismatch {
            expected: DType::native(TypeKind::Float, 8),
            found: DType::native(TypeKind::Int, 8),
        };
        assert_eq!(dtype.kind(), ErrorKind::Type);

        let shape = StoreError::ShapeMismatch {
            expected: vec![3],
            found: vec![4],
        };
        assert_eq!(shape.kind(), ErrorKind::Value);
        assert_eq!(StoreError::ZeroDimensional.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_format_io_becomes_io() {
        let err = StoreError::from(FormatError::Io(std::io::Error::other("disk gone")));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_slack_error_maps_to_value() {
        let err = StoreError::from(FormatError::InsufficientSlack {
            needed: 80,
            reserved: 70,
        });
        assert!(matches!(
            err,
            StoreError::InsufficientHeaderSlack {
                header_length: 70,
                required: 80
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_bad_magic_is_format() {
        let err = StoreError::from(FormatError::InvalidMagic(*b"PK\x03\x04\0\0"));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().starts_with("Invalid .npy file"));
    }
}
