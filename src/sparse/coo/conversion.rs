//! COO format conversion: dense → COO and back

use super::CooTensor;
use crate::error::{Error, Result};
use crate::runtime::{Allocator, HostAllocator};
use crate::sparse::{
    SparseDims, SparseTensor, SparseTensorAllocator, ensure_dense_source, has_non_zero_elements,
    nonzero_predicate,
};
use crate::tensor::{Layout, Shape, Storage, Tensor};

/// Width of one coordinate component in the index region
const INDEX_BYTES: usize = std::mem::size_of::<i32>();

impl CooTensor {
    /// Convert a dense tensor to a fully sparse COO tensor
    ///
    /// Every nonzero scalar becomes one stored entry.
    pub fn new(dense: &Tensor) -> Result<Self> {
        Self::with_sparse_dim(dense, dense.ndim())
    }

    /// Convert a dense tensor, keeping the last `ndim - sparse_dim` axes dense
    pub fn with_sparse_dim(dense: &Tensor, sparse_dim: usize) -> Result<Self> {
        Self::with_allocator(dense, sparse_dim, &HostAllocator::new())
    }

    /// Convert a dense tensor using `allocator` for the value storage
    ///
    /// The dense tensor is scanned twice: once to count the slices holding a
    /// nonzero element, then, after a single allocation sized for exactly
    /// that many slices plus `nnz * sparse_dim` `i32` coordinates, to copy
    /// them out.
    ///
    /// # Errors
    ///
    /// Checked in order, before anything is allocated:
    /// - `UnsupportedLayout` if the source is not canonical row-major
    /// - `InvalidInput` if the source is flagged sparse
    /// - `InvalidInput` if `sparse_dim` is not in `[1, ndim]`
    /// - `UnsupportedDType` if the element type has no nonzero test
    pub fn with_allocator(
        dense: &Tensor,
        sparse_dim: usize,
        allocator: &dyn Allocator,
    ) -> Result<Self> {
        ensure_dense_source(dense)?;
        let info = dense.info();
        let dims = SparseDims::new(info.num_dimensions(), sparse_dim)?;
        let is_nonzero = nonzero_predicate(info.dtype())?;

        let shape = info.shape();
        let sparse_shape = Shape::from(&shape[..sparse_dim]);
        let elem = info.element_size();
        let slice_len = shape.volume_from(sparse_dim) * elem;
        let slice_count = sparse_shape.elem_count();
        let src = dense.as_bytes()?;
        let slice = |i: usize| &src[i * slice_len..(i + 1) * slice_len];

        // Sizing pass
        let retained = (0..slice_count)
            .filter(|&i| has_non_zero_elements(slice(i), elem, is_nonzero))
            .count();

        let values_bytes = retained * slice_len;
        let indices_bytes = retained
            .checked_mul(sparse_dim * INDEX_BYTES)
            .ok_or_else(|| Error::invalid_input("COO index region overflows usize"))?;
        let mut storage =
            SparseTensorAllocator::init(info, values_bytes, indices_bytes).allocate(allocator)?;

        // Population pass
        let mut indices = Vec::with_capacity(retained);
        let dst = &mut storage.as_bytes_mut()[..values_bytes];
        for i in 0..slice_count {
            let s = slice(i);
            if !has_non_zero_elements(s, elem, is_nonzero) {
                continue;
            }
            let n = indices.len();
            dst[n * slice_len..(n + 1) * slice_len].copy_from_slice(s);
            indices.push(sparse_shape.unravel(i));
        }
        debug_assert_eq!(indices.len(), retained);

        log::debug!(
            "dense {:?} {} -> COO sparse_dim={} nnz={} ({} value bytes, {} index bytes)",
            shape.as_slice(),
            info.dtype(),
            sparse_dim,
            indices.len(),
            values_bytes,
            indices_bytes
        );

        Ok(Self {
            info: info.clone().with_sparse(true),
            dims,
            indices,
            storage,
        })
    }

    /// Scatter every stored slice into a zero-filled dense tensor
    pub(crate) fn scatter_to_dense(&self) -> Result<Tensor> {
        let info = self.info.clone().with_sparse(false);
        let elem = info.element_size();
        let len = self.slice_len();
        let mut storage = Storage::zeroed(info.total_size())?;

        let dst = storage.as_bytes_mut();
        for (n, coord) in self.indices.iter().enumerate() {
            let offset = coord
                .iter()
                .enumerate()
                .map(|(d, &c)| c * self.dense_volume(d + 1))
                .sum::<usize>()
                * elem;
            dst[offset..offset + len].copy_from_slice(self.slice_bytes(n));
        }

        let layout = Layout::contiguous(info.shape());
        Tensor::from_parts(info, layout, storage)
    }
}

impl Tensor {
    /// Convert to COO format
    ///
    /// `sparse_dim` defaults to `ndim()` (fully sparse).
    pub fn to_coo(&self, sparse_dim: Option<usize>) -> Result<CooTensor> {
        CooTensor::with_sparse_dim(self, sparse_dim.unwrap_or(self.ndim()))
    }
}
