//! Compatibility rules between a file and an incoming array

use crate::{Result, StoreError};
use appendnpy_format::{DType, Header};

/// Element type and row shape fixed by a file's first write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Established {
    /// Element type of every row
    pub dtype: DType,
    /// Dimensions after the leading axis
    pub trailing_shape: Vec<u64>,
}

impl Established {
    /// Read the established state from an on-disk header
    pub fn from_header(header: &Header) -> Self {
        Self {
            dtype: header.dtype,
            trailing_shape: header.trailing_shape().to_vec(),
        }
    }
}

/// Check that an array of `dtype` and `shape` may be appended
///
/// With nothing established, any dtype and any shape with at least one axis
/// is accepted and becomes the established state. Otherwise the dtype and
/// the trailing dimensions must match exactly; the leading dimension is free.
pub fn validate(
    established: Option<&Established>,
    dtype: DType,
    shape: &[u64],
) -> Result<Established> {
    let Some((_, trailing)) = shape.split_first() else {
        return Err(StoreError::ZeroDimensional);
    };

    let Some(established) = established else {
        return Ok(Established {
            dtype,
            trailing_shape: trailing.to_vec(),
        });
    };

    if established.dtype != dtype {
        return Err(StoreError::DtypeMismatch {
            expected: established.dtype,
            found: dtype,
        });
    }
    if established.trailing_shape != trailing {
        return Err(StoreError::ShapeMismatch {
            expected: established.trailing_shape.clone(),
            found: trailing.to_vec(),
        });
    }
    Ok(established.clone())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use appendnpy_format::TypeKind;

    fn f8() -> DType {
        DType::native(TypeKind::Float, 8)
    }

    fn rows_of(trailing: &[u64]) -> Established {
        Established {
            dtype: f8(),
            trailing_shape: trailing.to_vec(),
        }
    }

    #[test]
    fn test_new_file_accepts_anything() {
        let est = validate(None, DType::native(TypeKind::Int, 2), &[0, 7, 2]).unwrap();
        assert_eq!(est.trailing_shape, vec![7, 2]);
        assert_eq!(est.dtype, DType::native(TypeKind::Int, 2));
    }

    #[test]
    fn test_leading_dim_is_free() {
        let est = rows_of(&[3]);
        for rows in [0, 1, 1_000_000] {
            assert_eq!(validate(Some(&est), f8(), &[rows, 3]).unwrap(), est);
        }
    }

    #[test]
    fn test_dtype_mismatch() {
        let err =
            validate(Some(&rows_of(&[])), DType::native(TypeKind::Float, 4), &[10]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_trailing_shape_mismatch() {
        let err = validate(Some(&rows_of(&[3])), f8(), &[2, 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(matches!(
            err,
            StoreError::ShapeMismatch { ref expected, ref found }
                if expected == &[3] && found == &[4]
        ));

        let err = validate(Some(&rows_of(&[3])), f8(), &[2, 3, 1]).unwrap_err();
        assert!(matches!(err, StoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_zero_dimensional_rejected() {
        assert!(matches!(
            validate(None, f8(), &[]),
            Err(StoreError::ZeroDimensional)
        ));
    }
}
