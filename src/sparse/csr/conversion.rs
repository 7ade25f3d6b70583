//! CSR format conversion: dense → CSR and back

use super::{CsrBuffer, CsrTensor};
use crate::error::{Error, Result};
use crate::runtime::{Allocator, HostAllocator};
use crate::sparse::{SparseDims, SparseTensorAllocator, ensure_dense_source, nonzero_predicate};
use crate::tensor::{Layout, Storage, Tensor};

impl CsrTensor {
    /// Convert a 2-D dense tensor to CSR
    pub fn new(dense: &Tensor) -> Result<Self> {
        Self::with_allocator(dense, &HostAllocator::new())
    }

    /// Same as [`new`](Self::new)
    ///
    /// CSR is always fully sparse over both axes, so `sparse_dim` is ignored.
    pub fn with_sparse_dim(dense: &Tensor, sparse_dim: usize) -> Result<Self> {
        log::debug!("CSR conversion ignores sparse_dim={sparse_dim}");
        Self::new(dense)
    }

    /// Convert a 2-D dense tensor using `allocator` for the packed buffer
    ///
    /// The first scan counts nonzero scalars; the single allocation then
    /// holds `(rows + 1) * 4 + nnz * 4 + nnz * element_size` bytes; the
    /// second scan writes offsets, columns and values.
    ///
    /// # Errors
    ///
    /// Checked in order, before anything is allocated:
    /// - `UnsupportedLayout` if the source is not canonical row-major
    /// - `InvalidInput` if the source is flagged sparse
    /// - `UnsupportedShape` if the source is not 2-D
    /// - `UnsupportedDType` if the element type has no nonzero test
    /// - `InvalidInput` if the column count or nnz does not fit in `i32`
    pub fn with_allocator(dense: &Tensor, allocator: &dyn Allocator) -> Result<Self> {
        ensure_dense_source(dense)?;
        let info = dense.info();
        let shape = info.shape();
        if shape.ndim() != 2 {
            return Err(Error::UnsupportedShape {
                op: "CsrTensor::new",
                expected_ndim: 2,
                shape: shape.to_vec(),
            });
        }
        let dims = SparseDims::new(2, 2)?;
        let is_nonzero = nonzero_predicate(info.dtype())?;

        let (rows, cols) = (shape[0], shape[1]);
        if i32::try_from(cols).is_err() {
            return Err(Error::invalid_input(format!(
                "{cols} columns exceed the i32 index range"
            )));
        }

        let elem = info.element_size();
        let src = dense.as_bytes()?;

        // Sizing pass
        let nnz = src.chunks_exact(elem).filter(|e| is_nonzero(e)).count();
        if i32::try_from(nnz).is_err() {
            return Err(Error::invalid_input(format!(
                "{nnz} nonzeros exceed the i32 offset range"
            )));
        }

        let index_bytes = CsrBuffer::index_bytes(rows, nnz)
            .ok_or_else(|| Error::invalid_input("CSR index region overflows usize"))?;
        let storage =
            SparseTensorAllocator::init(info, nnz * elem, index_bytes).allocate(allocator)?;
        let mut buffer = CsrBuffer::new(storage, rows, nnz)?;

        // Population pass
        let (offsets, col_indices, values) = buffer.regions_mut();
        let row_len = cols * elem;
        let mut k = 0usize;
        for r in 0..rows {
            offsets[r] = k as i32;
            let row = &src[r * row_len..(r + 1) * row_len];
            for (c, e) in row.chunks_exact(elem).enumerate() {
                if is_nonzero(e) {
                    col_indices[k] = c as i32;
                    values[k * elem..(k + 1) * elem].copy_from_slice(e);
                    k += 1;
                }
            }
        }
        offsets[rows] = k as i32;
        debug_assert_eq!(k, nnz);

        log::debug!(
            "dense {:?} {} -> CSR nnz={} ({} packed bytes)",
            shape.as_slice(),
            info.dtype(),
            nnz,
            buffer.len()
        );

        Ok(Self {
            info: info.clone().with_sparse(true),
            dims,
            buffer,
        })
    }

    /// Scatter every stored value into a zero-filled dense matrix
    pub(crate) fn scatter_to_dense(&self) -> Result<Tensor> {
        let info = self.info.clone().with_sparse(false);
        let elem = info.element_size();
        let cols = self.ncols();
        let mut storage = Storage::zeroed(info.total_size())?;

        let dst = storage.as_bytes_mut();
        let col_indices = self.col_indices();
        for row in 0..self.nrows() {
            let Some(range) = self.row_range(row) else {
                continue;
            };
            if range.is_empty() {
                continue;
            }
            for k in range {
                let at = (row * cols + col_indices[k] as usize) * elem;
                dst[at..at + elem].copy_from_slice(self.value_bytes(k));
            }
        }

        let layout = Layout::contiguous(info.shape());
        Tensor::from_parts(info, layout, storage)
    }
}

impl Tensor {
    /// Convert to CSR format
    ///
    /// Only 2-D tensors can be converted.
    pub fn to_csr(&self) -> Result<CsrTensor> {
        CsrTensor::new(self)
    }
}
