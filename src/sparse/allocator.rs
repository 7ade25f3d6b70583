//! Storage sizing for sparse tensors

use crate::error::{Error, Result};
use crate::runtime::Allocator;
use crate::tensor::{Storage, TensorInfo};

/// Sizes and requests the single buffer a sparse tensor owns
///
/// Created by [`init`](Self::init) once the sizing pass knows how many bytes
/// the value and index regions need, then consumed by
/// [`allocate`](Self::allocate). Consuming `self` means a construction can
/// allocate at most once and never before it is sized.
#[derive(Debug)]
pub struct SparseTensorAllocator<'a> {
    info: &'a TensorInfo,
    values_bytes: usize,
    indices_bytes: usize,
}

impl<'a> SparseTensorAllocator<'a> {
    /// Record the region sizes for a sparse encoding of `info`
    pub fn init(info: &'a TensorInfo, values_bytes: usize, indices_bytes: usize) -> Self {
        Self {
            info,
            values_bytes,
            indices_bytes,
        }
    }

    /// Bytes reserved for element values
    pub fn values_bytes(&self) -> usize {
        self.values_bytes
    }

    /// Bytes reserved for coordinate metadata
    pub fn indices_bytes(&self) -> usize {
        self.indices_bytes
    }

    /// Request `values_bytes + indices_bytes` zeroed bytes from `allocator`
    pub fn allocate(self, allocator: &dyn Allocator) -> Result<Storage> {
        let size = self
            .values_bytes
            .checked_add(self.indices_bytes)
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        log::trace!(
            "sparse allocation for {:?} {}: {} value bytes + {} index bytes",
            self.info.shape(),
            self.info.dtype(),
            self.values_bytes,
            self.indices_bytes
        );
        let storage = allocator.allocate(size)?;
        debug_assert_eq!(storage.len(), size);
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::runtime::HostAllocator;

    #[test]
    fn test_allocates_both_regions_once() {
        let info = TensorInfo::new([3, 3], DType::I32);
        let host = HostAllocator::new();
        let sizing = SparseTensorAllocator::init(&info, 8, 24);
        assert_eq!(sizing.values_bytes(), 8);
        assert_eq!(sizing.indices_bytes(), 24);
        let storage = sizing.allocate(&host).unwrap();
        assert_eq!(storage.len(), 32);
        assert_eq!(host.allocation_count(), 1);
        assert_eq!(host.allocated_bytes(), 32);
    }

    #[test]
    fn test_overflow_is_out_of_memory() {
        let info = TensorInfo::new([1], DType::U8);
        let err = SparseTensorAllocator::init(&info, usize::MAX, 1)
            .allocate(&HostAllocator::new())
            .unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }
}
