//! Packed single-allocation storage for CSR tensors

use crate::error::{Error, Result};
use crate::tensor::Storage;

const INDEX_BYTES: usize = std::mem::size_of::<i32>();

/// One buffer holding the three CSR regions back to back
///
/// ```text
/// [ row offsets: (rows + 1) x i32 | column indices: nnz x i32 | values: nnz x elem ]
/// ```
///
/// The storage starts 8-byte aligned and both index regions are multiples
/// of four bytes long, so the typed views never straddle an alignment
/// boundary.
#[derive(Debug, Clone)]
pub struct CsrBuffer {
    storage: Storage,
    rows: usize,
    nnz: usize,
}

impl CsrBuffer {
    /// Bytes taken by the two index regions
    pub fn index_bytes(rows: usize, nnz: usize) -> Option<usize> {
        rows.checked_add(1)?
            .checked_add(nnz)?
            .checked_mul(INDEX_BYTES)
    }

    /// Wrap storage laid out for `rows` rows and `nnz` stored values
    pub(crate) fn new(storage: Storage, rows: usize, nnz: usize) -> Result<Self> {
        let index = Self::index_bytes(rows, nnz)
            .ok_or_else(|| Error::invalid_input("CSR index region overflows usize"))?;
        if storage.len() < index {
            return Err(Error::invalid_input(format!(
                "CSR storage of {} bytes cannot hold {index} index bytes",
                storage.len()
            )));
        }
        Ok(Self { storage, rows, nnz })
    }

    #[inline]
    fn offsets_end(&self) -> usize {
        (self.rows + 1) * INDEX_BYTES
    }

    #[inline]
    fn cols_end(&self) -> usize {
        self.offsets_end() + self.nnz * INDEX_BYTES
    }

    /// `rows + 1` non-decreasing offsets into the column and value regions
    pub fn row_offsets(&self) -> &[i32] {
        bytemuck::cast_slice(&self.storage.as_bytes()[..self.offsets_end()])
    }

    /// Column of every stored value, row by row
    pub fn col_indices(&self) -> &[i32] {
        bytemuck::cast_slice(&self.storage.as_bytes()[self.offsets_end()..self.cols_end()])
    }

    /// Raw bytes of the stored values
    pub fn values(&self) -> &[u8] {
        &self.storage.as_bytes()[self.cols_end()..]
    }

    /// Mutable views of the three regions, for population
    pub(crate) fn regions_mut(&mut self) -> (&mut [i32], &mut [i32], &mut [u8]) {
        let offsets_end = self.offsets_end();
        let cols_len = self.nnz * INDEX_BYTES;
        let bytes = self.storage.as_bytes_mut();
        let (offsets, rest) = bytes.split_at_mut(offsets_end);
        let (cols, values) = rest.split_at_mut(cols_len);
        (
            bytemuck::cast_slice_mut(offsets),
            bytemuck::cast_slice_mut(cols),
            values,
        )
    }

    /// The whole packed buffer
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Total size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True when the buffer holds no bytes at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}
