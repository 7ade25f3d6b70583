//! Tensor types
//!
//! This module provides the dense `Tensor` type, an n-dimensional array in
//! host memory, together with its metadata, layout and storage.

mod core;
mod info;
mod layout;
mod shape;
mod storage;

pub use core::Tensor;
pub use info::TensorInfo;
pub use layout::{DataLayout, Layout, Strides};
pub use shape::{Coordinates, Shape};
pub use storage::Storage;
