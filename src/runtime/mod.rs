//! Runtime services consumed by tensor construction
//!
//! Everything in this crate runs on the host, synchronously. The runtime
//! layer is limited to memory allocation, which sparse tensors obtain through
//! an injectable [`Allocator`].

mod allocator;

pub use allocator::{Allocator, HostAllocator};
