//! CSR (Compressed Sparse Row) format

mod buffer;
mod conversion;
mod core;

pub use buffer::CsrBuffer;
pub use core::CsrTensor;
