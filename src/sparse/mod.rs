//! Sparse tensor support for sparsekit
//!
//! This module converts dense tensors into sparse encodings and back.
//!
//! # Sparse Formats
//!
//! - **COO** (Coordinate): One coordinate tuple per stored slice plus the
//!   slice values. Works for any rank; with `sparse_dim < ndim` the trailing
//!   axes stay dense inside each slice (a *hybrid* tensor).
//!
//! - **CSR** (Compressed Sparse Row): Row offsets, column indices and values
//!   in one packed buffer. 2-D only.
//!
//! # Usage
//!
//! ```
//! use sparsekit::prelude::*;
//!
//! let dense = Tensor::from_slice(&[0i32, 0, 5, 0], &[4])?;
//!
//! let coo = dense.to_coo(None)?;
//! assert_eq!(coo.nnz(), 1);
//! assert_eq!(coo.get_coordinates(0)?.as_slice(), &[2]);
//! assert_eq!(coo.get_value_as::<i32>(&[2])?, Some(5));
//! assert_eq!(coo.get_value(&[0])?, None);
//!
//! let back = coo.to_dense()?;
//! assert_eq!(back.to_vec::<i32>()?, vec![0, 0, 5, 0]);
//! # Ok::<(), sparsekit::error::Error>(())
//! ```
//!
//! # Element Types
//!
//! Conversions accept 8/16/32-bit integers, the quantized types, `F16` and
//! `F32` (see [`nonzero_predicate`]). Other types fail with
//! `UnsupportedDType` before anything is allocated.

mod allocator;
mod base;
mod coo;
mod csr;
mod format;
mod predicate;

pub use allocator::SparseTensorAllocator;
pub(crate) use base::ensure_dense_source;
pub use base::{SparseDims, SparseTensor, has_non_zero_elements, print_values};
pub use coo::CooTensor;
pub use csr::{CsrBuffer, CsrTensor};
pub use format::SparseFormat;
pub use predicate::{NonzeroPredicate, nonzero_predicate};
