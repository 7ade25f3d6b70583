//! Common test utilities
#![allow(dead_code)]

use sparsekit::dtype::Element;
use sparsekit::runtime::{Allocator, HostAllocator};
use sparsekit::sparse::SparseTensor;
use sparsekit::tensor::{Layout, Storage, Tensor, TensorInfo};
use parking_lot::Mutex;

/// Build a dense tensor whose first element sits `pad` elements into storage
///
/// The padding elements are filled with `fill` so that a converter that
/// ignores the offset would pick them up.
pub fn offset_tensor<T: Element>(data: &[T], shape: &[usize], pad: usize, fill: T) -> Tensor {
    let mut padded = vec![fill; pad];
    padded.extend_from_slice(data);
    let storage = Storage::from_slice(&padded).expect("storage");
    let layout = Layout::contiguous(shape).with_offset(pad);
    Tensor::from_parts(TensorInfo::new(shape, T::DTYPE), layout, storage).expect("tensor")
}

/// Assert that every enumerated coordinate looks up the bytes stored at
/// the same position of the value region
pub fn assert_lookup_agreement(sparse: &dyn SparseTensor, values: &[u8], entry_bytes: usize) {
    for i in 0..sparse.nnz() {
        let coords = sparse.get_coordinates(i).expect("coordinates");
        let found = sparse
            .get_value(&coords)
            .expect("lookup")
            .expect("stored entry must be found");
        assert_eq!(
            found,
            &values[i * entry_bytes..(i + 1) * entry_bytes],
            "entry {i} at {coords:?}"
        );
    }
}

/// Allocator that records the size of every request it serves
#[derive(Debug, Default)]
pub struct RecordingAllocator {
    inner: HostAllocator,
    requests: Mutex<Vec<usize>>,
}

impl RecordingAllocator {
    /// Sizes requested so far, in order
    pub fn requests(&self) -> Vec<usize> {
        self.requests.lock().clone()
    }
}

impl Allocator for RecordingAllocator {
    fn allocate(&self, size_bytes: usize) -> sparsekit::error::Result<Storage> {
        self.requests.lock().push(size_bytes);
        self.inner.allocate(size_bytes)
    }

    fn allocated_bytes(&self) -> usize {
        self.inner.allocated_bytes()
    }

    fn allocation_count(&self) -> usize {
        self.inner.allocation_count()
    }
}
