//! Element type descriptors (`descr` field)
//!
//! A descriptor is a byte-order character, a kind character and a width,
//! e.g. `<f8` (little-endian 8-byte float) or `|u1` (single byte, no byte
//! order). Only simple descriptors are supported; structured and
//! parameterised types (`[('x', '<f8')]`, `<M8[ns]`) are rejected.

use crate::error::{FormatError, Result};
use std::fmt;
use std::str::FromStr;

/// Byte order of an element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// `<`
    Little,
    /// `>`
    Big,
    /// `|`, for types where byte order has no meaning
    NotApplicable,
}

impl ByteOrder {
    /// Byte order of the target platform
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Descriptor character
    pub const fn as_char(self) -> char {
        match self {
            Self::Little => '<',
            Self::Big => '>',
            Self::NotApplicable => '|',
        }
    }
}

/// Element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `b`
    Bool,
    /// `i`
    Int,
    /// `u`
    UInt,
    /// `f`
    Float,
    /// `c`
    Complex,
    /// `S`, width in bytes
    Bytes,
    /// `U`, width in UCS-4 characters
    Unicode,
    /// `V`, width in bytes
    Void,
}

impl TypeKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::Bool),
            'i' => Some(Self::Int),
            'u' => Some(Self::UInt),
            'f' => Some(Self::Float),
            'c' => Some(Self::Complex),
            'S' | 'a' => Some(Self::Bytes),
            'U' => Some(Self::Unicode),
            'V' => Some(Self::Void),
            _ => None,
        }
    }

    /// Descriptor character
    pub const fn as_char(self) -> char {
        match self {
            Self::Bool => 'b',
            Self::Int => 'i',
            Self::UInt => 'u',
            Self::Float => 'f',
            Self::Complex => 'c',
            Self::Bytes => 'S',
            Self::Unicode => 'U',
            Self::Void => 'V',
        }
    }

    /// Kinds stored as opaque bytes never carry a byte order
    const fn is_byte_oriented(self) -> bool {
        matches!(self, Self::Bool | Self::Bytes | Self::Void)
    }
}

/// A simple element type descriptor
///
/// Descriptors are normalised when parsed: `=` becomes the platform byte
/// order and single-byte types become [`ByteOrder::NotApplicable`], so two
/// descriptors describing the same in-memory layout compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    byte_order: ByteOrder,
    kind: TypeKind,
    width: usize,
}

impl DType {
    /// Create a normalised descriptor
    pub const fn new(byte_order: ByteOrder, kind: TypeKind, width: usize) -> Self {
        let single_byte = width == 1 && !matches!(kind, TypeKind::Unicode);
        let byte_order = if kind.is_byte_oriented() || single_byte {
            ByteOrder::NotApplicable
        } else if matches!(byte_order, ByteOrder::NotApplicable) {
            ByteOrder::native()
        } else {
            byte_order
        };
        Self {
            byte_order,
            kind,
            width,
        }
    }

    /// Descriptor for a platform-native element of the given kind and width
    pub const fn native(kind: TypeKind, width: usize) -> Self {
        Self::new(ByteOrder::native(), kind, width)
    }

    /// Byte order
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Kind
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Width as written in the descriptor
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Size of one element in bytes
    pub const fn item_size(&self) -> usize {
        match self.kind {
            TypeKind::Unicode => self.width * 4,
            _ => self.width,
        }
    }

    /// Parse a descriptor string such as `<f8`
    pub fn parse(descr: &str) -> Result<Self> {
        let unsupported = || FormatError::UnsupportedDescr(descr.to_string());

        let mut chars = descr.chars().peekable();
        let byte_order = match chars.peek() {
            Some('<') => Some(ByteOrder::Little),
            Some('>') => Some(ByteOrder::Big),
            Some('|') => Some(ByteOrder::NotApplicable),
            Some('=') => Some(ByteOrder::native()),
            _ => None,
        };
        if byte_order.is_some() {
            chars.next();
        }

        let kind = chars
            .next()
            .and_then(TypeKind::from_char)
            .ok_or_else(unsupported)?;

        let digits: String = chars.collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unsupported());
        }
        let width: usize = digits.parse().map_err(|_| unsupported())?;
        if width == 0 && !matches!(kind, TypeKind::Void) {
            return Err(unsupported());
        }

        Ok(Self::new(
            byte_order.unwrap_or(ByteOrder::NotApplicable),
            kind,
            width,
        ))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.byte_order.as_char(),
            self.kind.as_char(),
            self.width
        )
    }
}

impl FromStr for DType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float() {
        let dtype = DType::parse("<f8").expect("Should parse <f8");
        assert_eq!(dtype.byte_order(), ByteOrder::Little);
        assert_eq!(dtype.kind(), TypeKind::Float);
        assert_eq!(dtype.item_size(), 8);
        assert_eq!(dtype.to_string(), "<f8");
    }

    #[test]
    fn test_single_byte_types_have_no_byte_order() {
        assert_eq!(DType::parse("<u1").unwrap().to_string(), "|u1");
        assert_eq!(DType::parse("|i1").unwrap().to_string(), "|i1");
        assert_eq!(DType::parse("|b1").unwrap().to_string(), "|b1");
        assert_eq!(DType::parse("|S12").unwrap().to_string(), "|S12");
    }

    #[test]
    fn test_native_order_is_resolved() {
        let dtype = DType::parse("=i4").unwrap();
        assert_eq!(dtype.byte_order(), ByteOrder::native());
        assert_eq!(dtype, DType::native(TypeKind::Int, 4));
    }

    #[test]
    fn test_byte_order_distinguishes() {
        assert_ne!(DType::parse("<f4").unwrap(), DType::parse(">f4").unwrap());
        assert_ne!(DType::parse("<f4").unwrap(), DType::parse("<f8").unwrap());
        assert_ne!(DType::parse("<i8").unwrap(), DType::parse("<f8").unwrap());
    }

    #[test]
    fn test_unicode_item_size() {
        let dtype = DType::parse("<U10").unwrap();
        assert_eq!(dtype.width(), 10);
        assert_eq!(dtype.item_size(), 40);
        assert_eq!(dtype.to_string(), "<U10");
    }

    #[test]
    fn test_reject_unsupported() {
        for descr in ["", "<", "<x8", "<f", "<f8x", "<M8[ns]", "<i0", "f-8"] {
            assert!(
                matches!(DType::parse(descr), Err(FormatError::UnsupportedDescr(_))),
                "{descr} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let dtype: DType = ">c16".parse().unwrap();
        assert_eq!(dtype.kind(), TypeKind::Complex);
        assert_eq!(dtype.byte_order(), ByteOrder::Big);
    }
}
