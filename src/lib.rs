//! # sparsekit
//!
//! **Dense ⇄ sparse tensor conversion for Rust.**
//!
//! sparsekit turns dense n-dimensional tensors into compact sparse encodings
//! and back, for inference workloads where weights and activations are
//! mostly zero.
//!
//! ## Features
//!
//! - **COO**: Coordinate lists over any rank, with an optional sparse/dense
//!   axis split (hybrid tensors)
//! - **CSR**: Compressed sparse rows for 2-D tensors, in one packed buffer
//! - **Quantized types**: QAsymm8, QSymm8, QSymm16 and friends, with
//!   quantization metadata carried through every conversion
//! - **Injectable allocation**: Every sparse tensor makes exactly one
//!   allocation through a caller-supplied [`runtime::Allocator`]
//!
//! ## Quick Start
//!
//! ```rust
//! use sparsekit::prelude::*;
//!
//! let dense = Tensor::from_slice(&[1i32, 0, 0, 0, 0, 0, 0, 7, 0], &[3, 3])?;
//!
//! let csr = dense.to_csr()?;
//! assert_eq!(csr.row_offsets(), &[0, 1, 1, 2]);
//! assert_eq!(csr.col_indices(), &[0, 1]);
//! assert_eq!(csr.get_value_as::<i32>(&[2, 1])?, Some(7));
//!
//! let round_trip = csr.to_dense()?;
//! assert_eq!(round_trip.to_vec::<i32>()?, dense.to_vec::<i32>()?);
//! # Ok::<(), sparsekit::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: Half-precision element types (`half::f16`, `half::bf16`) and
//!   decimal printing of F16 values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod runtime;
pub mod sparse;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element, QuantizationInfo};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Allocator, HostAllocator};
    pub use crate::sparse::{CooTensor, CsrTensor, SparseFormat, SparseTensor};
    pub use crate::tensor::{DataLayout, Layout, Tensor, TensorInfo};
}
