//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to sparsekit's runtime dtype
/// system. It's implemented for the primitive numeric types the converters
/// accept, plus `half::f16` when the `f16` feature is enabled.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe reinterpretation of byte storage (bytemuck)
/// - `PartialEq + Debug` - Comparing and printing recovered values
///
/// Quantized dtypes have no Rust type of their own. Their values are read
/// through the element type of [`DType::storage_dtype`].
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialEq + std::fmt::Debug + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Zero value
    fn zero() -> Self {
        Self::zeroed()
    }
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element!(
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
);

#[cfg(feature = "f16")]
impl_element!(half::f16 => F16, half::bf16 => BF16);
