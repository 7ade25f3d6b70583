//! Nonzero tests over raw element bytes

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Tests whether the bytes of one element encode a nonzero value
///
/// The slice holds exactly one element in native byte order. A slice that is
/// too short for the element type is treated as zero.
pub type NonzeroPredicate = fn(&[u8]) -> bool;

/// Select the nonzero test for an element type
///
/// Quantized types are tested on their stored integer, so a quantized zero
/// point is not special. `F32` compares as a float (`-0.0` is zero, NaN is
/// nonzero) while `F16` compares its raw bit pattern (`-0.0` is nonzero).
///
/// # Errors
///
/// `UnsupportedDType` for `F64`, `BF16`, `I64`, `U64` and `Bool`.
pub fn nonzero_predicate(dtype: DType) -> Result<NonzeroPredicate> {
    let predicate: NonzeroPredicate = match dtype {
        DType::U8 | DType::QAsymm8 => |b| b.first().is_some_and(|&v| v != 0),
        DType::I8 | DType::QAsymm8Signed | DType::QSymm8 | DType::QSymm8PerChannel => {
            |b| b.first().is_some_and(|&v| v as i8 != 0)
        }
        DType::U16 | DType::QAsymm16 => {
            |b| b.first_chunk().is_some_and(|c| u16::from_ne_bytes(*c) != 0)
        }
        DType::I16 | DType::QSymm16 => {
            |b| b.first_chunk().is_some_and(|c| i16::from_ne_bytes(*c) != 0)
        }
        DType::F16 => |b| b.first_chunk().is_some_and(|c| u16::from_ne_bytes(*c) != 0),
        DType::U32 => |b| b.first_chunk().is_some_and(|c| u32::from_ne_bytes(*c) != 0),
        DType::I32 => |b| b.first_chunk().is_some_and(|c| i32::from_ne_bytes(*c) != 0),
        DType::F32 => |b| b.first_chunk().is_some_and(|c| f32::from_ne_bytes(*c) != 0.0),
        DType::F64 | DType::BF16 | DType::I64 | DType::U64 | DType::Bool => {
            return Err(Error::unsupported_dtype(dtype, "nonzero_predicate"));
        }
    };
    Ok(predicate)
}
