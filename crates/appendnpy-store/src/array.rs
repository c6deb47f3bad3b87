//! Row-major array views and owned arrays

use crate::element::Element;
use crate::{Result, StoreError};

fn check_len(shape: &[u64], len: usize) -> Result<()> {
    let count = shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| StoreError::InvalidArray(format!("shape {shape:?} overflows")))?;
    if count != len as u64 {
        return Err(StoreError::InvalidArray(format!(
            "shape {shape:?} needs {count} elements, got {len}"
        )));
    }
    Ok(())
}

/// Borrowed row-major data with a shape
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayView<'a, T> {
    shape: Vec<u64>,
    data: &'a [T],
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// View `data` with `shape`
    ///
    /// An empty shape describes a zero-dimensional array holding one value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArray`] when the element count implied by
    /// `shape` differs from `data.len()`.
    pub fn new(shape: Vec<u64>, data: &'a [T]) -> Result<Self> {
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// One-dimensional view over `data`
    pub fn from_slice(data: &'a [T]) -> Self {
        Self {
            shape: vec![data.len() as u64],
            data,
        }
    }

    /// A single value viewed as a length-1 array
    pub fn scalar(value: &'a T) -> Self {
        Self {
            shape: vec![1],
            data: std::slice::from_ref(value),
        }
    }

    /// Dimensions, leading axis first
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Elements in row-major order
    pub const fn data(&self) -> &'a [T] {
        self.data
    }

    /// Native-order payload bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * T::dtype().item_size());
        T::encode(self.data, &mut out);
        out
    }
}

/// Owned row-major array, as loaded by [`crate::read_array`]
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray<T> {
    shape: Vec<u64>,
    data: Vec<T>,
}

impl<T: Element> NdArray<T> {
    /// Wrap `data` with `shape`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArray`] when the element count implied by
    /// `shape` differs from `data.len()`.
    pub fn new(shape: Vec<u64>, data: Vec<T>) -> Result<Self> {
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// Dimensions, leading axis first
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Elements in row-major order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Number of rows along the leading axis
    pub fn rows(&self) -> u64 {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Borrow as a view, e.g. to append it to another file
    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView {
            shape: self.shape.clone(),
            data: &self.data,
        }
    }

    /// Take the elements
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}
