//! COO (Coordinate) sparse format

mod conversion;
mod core;

pub use core::CooTensor;
