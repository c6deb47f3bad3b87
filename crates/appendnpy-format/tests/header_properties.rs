#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Property tests for header layout and in-place shape rewrites

use appendnpy_format::{ARRAY_ALIGN, DType, FormatError, Header, StoredHeader, TypeKind};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::io::Cursor;

fn dtype() -> impl Strategy<Value = DType> {
    prop_oneof![
        Just(DType::native(TypeKind::Float, 8)),
        Just(DType::native(TypeKind::Float, 4)),
        Just(DType::native(TypeKind::Int, 8)),
        Just(DType::native(TypeKind::Int, 2)),
        Just(DType::native(TypeKind::UInt, 1)),
        Just(DType::native(TypeKind::Bool, 1)),
        Just(DType::parse(">f8").expect("valid descr")),
        Just(DType::parse("<c16").expect("valid descr")),
    ]
}

fn shape() -> impl Strategy<Value = Vec<u64>> {
    (
        0u64..1_000_000,
        prop::collection::vec(0u64..10_000, 0..4),
    )
        .prop_map(|(rows, mut trailing)| {
            trailing.insert(0, rows);
            trailing
        })
}

proptest! {
    /// Every created header parses back to itself
    #[test]
    fn created_header_round_trips(dtype in dtype(), shape in shape()) {
        let stored = StoredHeader::create(Header::new(dtype, shape))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let bytes = stored.to_bytes().map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(bytes.len() as u64, stored.payload_offset());
        prop_assert_eq!(bytes.len() % ARRAY_ALIGN, 0);
        prop_assert_eq!(bytes.last(), Some(&b'\n'));

        let parsed = StoredHeader::parse(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, stored);
    }

    /// Any 64-bit row count fits the region reserved at creation
    #[test]
    fn created_header_accepts_any_row_count(
        dtype in dtype(),
        shape in shape(),
        rows in any::<u64>(),
    ) {
        let mut stored = StoredHeader::create(Header::new(dtype, shape.clone()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let offset = stored.payload_offset();
        let bytes = stored.to_bytes().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut file = Cursor::new(bytes);

        let mut grown = shape;
        grown[0] = rows;
        stored
            .rewrite_shape_in_place(&mut file, grown.clone())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let parsed = StoredHeader::parse(file.get_ref())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&parsed.header.shape, &grown);
        prop_assert_eq!(parsed.payload_offset(), offset);
        prop_assert_eq!(file.get_ref().len() as u64, offset);
    }

    /// Exact headers grow only as far as their alignment padding allows
    #[test]
    fn exact_header_growth_is_bounded_by_padding(dtype in dtype(), shape in shape()) {
        let mut stored = StoredHeader::exact(Header::new(dtype, shape.clone()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let extra_digits = 20 - shape[0].to_string().len();
        let growable = stored.slack() >= extra_digits;
        prop_assert_eq!(stored.can_grow(), growable);
        prop_assert_eq!(stored.fits_leading_dim(u64::MAX), growable);

        let original = stored.to_bytes().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut file = Cursor::new(original.clone());
        let mut grown = shape.clone();
        grown[0] = u64::MAX;

        let result = stored.rewrite_shape_in_place(&mut file, grown);
        if growable {
            prop_assert!(result.is_ok());
            prop_assert_eq!(file.get_ref().len(), original.len());
        } else {
            let is_slack_error = matches!(result, Err(FormatError::InsufficientSlack { .. }));
            prop_assert!(is_slack_error);
            prop_assert_eq!(file.into_inner(), original);
            prop_assert_eq!(&stored.header.shape, &shape);
        }
    }
}
