//! Rust element types and their `.npy` descriptors

use appendnpy_format::{DType, TypeKind};

/// A fixed-size element that can be stored in an array file
///
/// Elements are stored in native byte order, so the descriptor of an
/// implementor always carries the host's byte order mark.
pub trait Element: Copy + 'static {
    /// Descriptor written for this type
    fn dtype() -> DType;

    /// Append the native-order bytes of `values` to `out`
    fn encode(values: &[Self], out: &mut Vec<u8>);

    /// Decode native-order bytes; a trailing partial element is ignored
    fn decode(bytes: &[u8]) -> Vec<Self>;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                fn dtype() -> DType {
                    DType::native($kind, size_of::<$ty>())
                }

                fn encode(values: &[Self], out: &mut Vec<u8>) {
                    out.reserve(values.len() * size_of::<$ty>());
                    for value in values {
                        out.extend_from_slice(&value.to_ne_bytes());
                    }
                }

                fn decode(bytes: &[u8]) -> Vec<Self> {
                    bytes
                        .chunks_exact(size_of::<$ty>())
                        .map(|chunk| {
                            let mut buf = [0u8; size_of::<$ty>()];
                            buf.copy_from_slice(chunk);
                            <$ty>::from_ne_bytes(buf)
                        })
                        .collect()
                }
            }
        )*
    };
}

impl_element! {
    i8 => TypeKind::Int,
    i16 => TypeKind::Int,
    i32 => TypeKind::Int,
    i64 => TypeKind::Int,
    u8 => TypeKind::UInt,
    u16 => TypeKind::UInt,
    u32 => TypeKind::UInt,
    u64 => TypeKind::UInt,
    f32 => TypeKind::Float,
    f64 => TypeKind::Float,
}

impl Element for bool {
    fn dtype() -> DType {
        DType::native(TypeKind::Bool, 1)
    }

    fn encode(values: &[Self], out: &mut Vec<u8>) {
        out.extend(values.iter().map(|&v| u8::from(v)));
    }

    fn decode(bytes: &[u8]) -> Vec<Self> {
        bytes.iter().map(|&b| b != 0).collect()
    }
}
