//! Core CSR implementation: struct, getters, lookups

use super::CsrBuffer;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::sparse::{SparseDims, SparseFormat, SparseTensor, print_values};
use crate::tensor::{Coordinates, Tensor, TensorInfo};
use smallvec::smallvec;
use std::fmt;

/// CSR (Compressed Sparse Row) matrix
///
/// Row `r` owns the entries `row_offsets[r]..row_offsets[r + 1]` of the
/// column-index and value regions, in left-to-right column order. All three
/// regions live in one [`CsrBuffer`].
#[derive(Debug, Clone)]
pub struct CsrTensor {
    pub(crate) info: TensorInfo,
    pub(crate) dims: SparseDims,
    pub(crate) buffer: CsrBuffer,
}

impl CsrTensor {
    /// Returns the number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.shape()[0]
    }

    /// Returns the number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.shape()[1]
    }

    /// Returns the row offsets (length `nrows + 1`)
    pub fn row_offsets(&self) -> &[i32] {
        self.buffer.row_offsets()
    }

    /// Returns the column indices (length `nnz`)
    pub fn col_indices(&self) -> &[i32] {
        self.buffer.col_indices()
    }

    /// Returns the raw value bytes (length `nnz * element_size`)
    pub fn values(&self) -> &[u8] {
        self.buffer.values()
    }

    /// Returns the packed buffer
    pub fn packed(&self) -> &CsrBuffer {
        &self.buffer
    }

    /// Stored values as a typed slice
    ///
    /// `T` must be the storage type of the tensor's dtype.
    pub fn values_as<T: Element>(&self) -> Result<&[T]> {
        let stored = self.info.dtype().storage_dtype();
        if stored != T::DTYPE {
            return Err(Error::DTypeMismatch {
                lhs: stored,
                rhs: T::DTYPE,
            });
        }
        bytemuck::try_cast_slice(self.buffer.values())
            .map_err(|e| Error::invalid_input(format!("cannot view CSR values: {e}")))
    }

    /// Returns the number of stored values in a row
    pub fn row_nnz(&self, row: usize) -> Option<usize> {
        let range = self.row_range(row)?;
        Some(range.len())
    }

    /// Range of stored entries belonging to `row`
    pub(crate) fn row_range(&self, row: usize) -> Option<std::ops::Range<usize>> {
        let offsets = self.row_offsets();
        let start = *offsets.get(row)? as usize;
        let end = *offsets.get(row + 1)? as usize;
        Some(start..end)
    }

    #[inline]
    pub(crate) fn value_bytes(&self, k: usize) -> &[u8] {
        let elem = self.info.element_size();
        &self.buffer.values()[k * elem..(k + 1) * elem]
    }
}

impl SparseTensor for CsrTensor {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csr
    }

    fn dims(&self) -> SparseDims {
        self.dims
    }

    fn info(&self) -> &TensorInfo {
        &self.info
    }

    fn nnz(&self) -> usize {
        self.buffer.col_indices().len()
    }

    fn buffer(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    fn to_dense(&self) -> Result<Tensor> {
        self.scatter_to_dense()
    }

    fn get_coordinates(&self, nth: usize) -> Result<Coordinates> {
        let nnz = self.nnz();
        if nth >= nnz {
            return Err(Error::index_out_of_range(&[nth], &[nnz]));
        }
        // offsets[0] == 0 <= nth, so at least one offset precedes the split
        let row = self.row_offsets().partition_point(|&o| (o as usize) <= nth) - 1;
        let col = self.col_indices()[nth] as usize;
        Ok(smallvec![row, col])
    }

    fn get_value(&self, coords: &[usize]) -> Result<Option<&[u8]>> {
        let &[row, col] = coords else {
            return Err(Error::index_out_of_range(coords, self.shape()));
        };
        if row >= self.nrows() || col >= self.ncols() {
            return Err(Error::index_out_of_range(coords, self.shape()));
        }
        let Some(range) = self.row_range(row) else {
            return Ok(None);
        };
        let start = range.start;
        Ok(self.col_indices()[range]
            .iter()
            .position(|&c| c as usize == col)
            .map(|k| self.value_bytes(start + k)))
    }

    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let dtype = self.info.dtype();
        writeln!(
            out,
            "CSR {} {:?} nnz={}",
            dtype,
            self.shape().as_slice(),
            self.nnz()
        )?;
        writeln!(out, "  row_offsets: {:?}", self.row_offsets())?;
        writeln!(out, "  col_indices: {:?}", self.col_indices())?;
        write!(out, "  values: ")?;
        print_values(out, self.buffer.values(), 0, self.nnz(), dtype)?;
        writeln!(out)
    }

    fn memory_usage(&self) -> usize {
        self.buffer.len()
    }
}

impl fmt::Display for CsrTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f)
    }
}
