//! Memory allocator trait and host implementation
//!
//! Sparse tensors obtain their storage through an `Allocator`, so callers can
//! inject their own accounting or pooling without touching the converters.

use crate::error::Result;
use crate::tensor::Storage;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memory allocator trait
///
/// Allocators hand out zero-initialised host storage and may keep
/// accounting of what they handed out.
pub trait Allocator: Send + Sync {
    /// Allocate zeroed storage of the given size
    fn allocate(&self, size_bytes: usize) -> Result<Storage>;

    /// Get the total allocated bytes
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }

    /// Get the number of allocations served
    fn allocation_count(&self) -> usize {
        0
    }
}

/// Heap allocator with allocation accounting
///
/// Counters only ever grow: storage is released by dropping it, which the
/// allocator does not observe.
#[derive(Debug, Default)]
pub struct HostAllocator {
    bytes: AtomicUsize,
    count: AtomicUsize,
}

impl HostAllocator {
    /// Create a new host allocator
    pub fn new() -> Self {
        Self::default()
    }
}

impl Allocator for HostAllocator {
    fn allocate(&self, size_bytes: usize) -> Result<Storage> {
        log::trace!("host allocation of {size_bytes} bytes");
        let storage = Storage::zeroed(size_bytes)?;
        self.bytes.fetch_add(size_bytes, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(storage)
    }

    fn allocated_bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    fn allocation_count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
