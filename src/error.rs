//! Error types for sparsekit

use crate::dtype::DType;
use crate::tensor::DataLayout;
use thiserror::Error;

/// Result type alias using sparsekit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting or querying tensors
///
/// Every precondition of a dense ⇄ sparse conversion is checked before any
/// storage is allocated, so an `Err` never leaves a half-built tensor behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input is structurally invalid for the requested operation
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// Dense source is not stored in the canonical row-major layout
    #[error("Unsupported layout {layout:?}: {reason}")]
    UnsupportedLayout {
        /// Declared physical layout of the source
        layout: DataLayout,
        /// What made the layout unusable
        reason: &'static str,
    },

    /// Tensor rank is not supported by the operation
    #[error("Operation '{op}' requires a {expected_ndim}-D tensor, got shape {shape:?}")]
    UnsupportedShape {
        /// The operation name
        op: &'static str,
        /// Rank the operation accepts
        expected_ndim: usize,
        /// Shape that was supplied
        shape: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Index or coordinate outside the valid range
    #[error("Index {index:?} out of range for extents {extents:?}")]
    IndexOutOfRange {
        /// The offending index or coordinate tuple
        index: Vec<usize>,
        /// Valid extents the index was checked against
        extents: Vec<usize>,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// DType mismatch between a typed request and the stored data
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Stored dtype
        lhs: DType,
        /// Requested dtype
        rhs: DType,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: &[usize], extents: &[usize]) -> Self {
        Self::IndexOutOfRange {
            index: index.to_vec(),
            extents: extents.to_vec(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::unsupported_dtype(DType::F64, "nonzero_predicate");
        assert_eq!(
            err.to_string(),
            "Unsupported dtype F64 for operation 'nonzero_predicate'"
        );

        let err = Error::index_out_of_range(&[4], &[3]);
        assert_eq!(err.to_string(), "Index [4] out of range for extents [3]");

        let err = Error::UnsupportedShape {
            op: "CsrTensor::new",
            expected_ndim: 2,
            shape: vec![2, 2, 2],
        };
        assert_eq!(
            err.to_string(),
            "Operation 'CsrTensor::new' requires a 2-D tensor, got shape [2, 2, 2]"
        );
    }
}
