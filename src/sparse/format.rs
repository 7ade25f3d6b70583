//! Sparse format definitions

use super::{CooTensor, CsrTensor, SparseTensor};
use crate::error::Result;
use crate::tensor::Tensor;

/// Sparse tensor storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    /// Coordinate format (COO)
    ///
    /// Stores one coordinate tuple per retained slice plus the slice values.
    /// Best for: N-D tensors, hybrid sparse/dense tensors
    /// Storage: O(sparse_dim * nnz + nnz * slice_len)
    Coo,

    /// Compressed Sparse Row (CSR)
    ///
    /// Row offsets + column indices + values, packed in one buffer.
    /// Best for: 2-D matrices, row access
    /// Storage: O(2 * nnz + nrows + 1)
    Csr,
}

impl SparseFormat {
    /// Returns true if format is efficient for row operations
    #[inline]
    pub fn is_row_major(&self) -> bool {
        matches!(self, SparseFormat::Csr)
    }

    /// Returns the format name as a string
    pub fn name(&self) -> &'static str {
        match self {
            SparseFormat::Coo => "COO",
            SparseFormat::Csr => "CSR",
        }
    }
}

impl std::fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Tensor {
    /// Convert to the given sparse format
    ///
    /// COO conversions are fully sparse (`sparse_dim == ndim()`).
    pub fn to_sparse(&self, format: SparseFormat) -> Result<Box<dyn SparseTensor>> {
        Ok(match format {
            SparseFormat::Coo => Box::new(CooTensor::new(self)?),
            SparseFormat::Csr => Box::new(CsrTensor::new(self)?),
        })
    }
}
