//! Data type system for sparsekit tensors
//!
//! This module provides the `DType` enum representing all element types a
//! tensor can be tagged with, including the quantized integer types used by
//! inference workloads, along with the `Element` bridge to Rust scalars and
//! quantization metadata.

mod element;
mod quantization;

pub use element::Element;
pub use quantization::QuantizationInfo;

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Data types a tensor can be tagged with
///
/// This enum represents the element type of a tensor at runtime. Tensor data
/// lives in untyped byte storage; the tag says how to interpret it.
///
/// # Discriminant Values (Serialization Stability)
///
/// The discriminant values are **stable** for serialization purposes:
/// - Floats: 0-9 (F64=0, F32=1, F16=2, BF16=3)
/// - Signed ints: 10-19 (I64=10, I32=11, I16=12, I8=13)
/// - Unsigned ints: 20-29 (U64=20, U32=21, U16=22, U8=23)
/// - Bool: 30
/// - Quantized: 50-59 (QAsymm8=50 ... QAsymm16=55)
///
/// New types will use reserved ranges. Existing values are NEVER changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    // Floating point types (0-9)
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 16-bit floating point (IEEE 754)
    F16 = 2,
    /// 16-bit brain floating point
    BF16 = 3,

    // Integer types
    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
    /// 16-bit signed integer
    I16 = 12,
    /// 8-bit signed integer
    I8 = 13,

    // Unsigned integer types
    /// 64-bit unsigned integer
    U64 = 20,
    /// 32-bit unsigned integer
    U32 = 21,
    /// 16-bit unsigned integer
    U16 = 22,
    /// 8-bit unsigned integer
    U8 = 23,

    /// Boolean type
    Bool = 30,

    // Quantized types
    /// 8-bit asymmetric quantized, stored as u8
    QAsymm8 = 50,
    /// 8-bit asymmetric quantized, stored as i8
    QAsymm8Signed = 51,
    /// 8-bit symmetric quantized, stored as i8
    QSymm8 = 52,
    /// 8-bit symmetric quantized with one scale per channel, stored as i8
    QSymm8PerChannel = 53,
    /// 16-bit symmetric quantized, stored as i16
    QSymm16 = 54,
    /// 16-bit asymmetric quantized, stored as u16
    QAsymm16 = 55,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 | Self::QSymm16 | Self::QAsymm16 => 2,
            Self::I8
            | Self::U8
            | Self::Bool
            | Self::QAsymm8
            | Self::QAsymm8Signed
            | Self::QSymm8
            | Self::QSymm8PerChannel => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U64 | Self::U32 | Self::U16 | Self::U8)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this is a quantized type
    #[inline]
    pub const fn is_quantized(self) -> bool {
        matches!(
            self,
            Self::QAsymm8
                | Self::QAsymm8Signed
                | Self::QSymm8
                | Self::QSymm8PerChannel
                | Self::QSymm16
                | Self::QAsymm16
        )
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// The plain type the raw elements are stored as
    ///
    /// Quantized types map to the integer type holding their quantized
    /// values; every other type maps to itself.
    #[inline]
    pub const fn storage_dtype(self) -> Self {
        match self {
            Self::QAsymm8 => Self::U8,
            Self::QAsymm8Signed | Self::QSymm8 | Self::QSymm8PerChannel => Self::I8,
            Self::QSymm16 => Self::I16,
            Self::QAsymm16 => Self::U16,
            other => other,
        }
    }

    /// Short name for display (e.g., "f32", "qasymm8")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::Bool => "bool",
            Self::QAsymm8 => "qasymm8",
            Self::QAsymm8Signed => "qasymm8_signed",
            Self::QSymm8 => "qsymm8",
            Self::QSymm8PerChannel => "qsymm8_per_channel",
            Self::QSymm16 => "qsymm16",
            Self::QAsymm16 => "qasymm16",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DTypeSet {
    bits: u64,
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// All floating point types
    pub const FLOATS: Self = Self {
        bits: (1 << DType::F64 as u8)
            | (1 << DType::F32 as u8)
            | (1 << DType::F16 as u8)
            | (1 << DType::BF16 as u8),
    };

    /// All signed integer types
    pub const SIGNED_INTS: Self = Self {
        bits: (1 << DType::I64 as u8)
            | (1 << DType::I32 as u8)
            | (1 << DType::I16 as u8)
            | (1 << DType::I8 as u8),
    };

    /// All unsigned integer types
    pub const UNSIGNED_INTS: Self = Self {
        bits: (1 << DType::U64 as u8)
            | (1 << DType::U32 as u8)
            | (1 << DType::U16 as u8)
            | (1 << DType::U8 as u8),
    };

    /// All integer types
    pub const INTS: Self = Self {
        bits: Self::SIGNED_INTS.bits | Self::UNSIGNED_INTS.bits,
    };

    /// All quantized types
    pub const QUANTIZED: Self = Self {
        bits: (1 << DType::QAsymm8 as u8)
            | (1 << DType::QAsymm8Signed as u8)
            | (1 << DType::QSymm8 as u8)
            | (1 << DType::QSymm8PerChannel as u8)
            | (1 << DType::QSymm16 as u8)
            | (1 << DType::QAsymm16 as u8),
    };

    /// Types the dense ⇄ sparse conversions accept
    ///
    /// 8/16/32-bit integers, every quantized type, F16 and F32.
    pub const SPARSE_CONVERTIBLE: Self = Self {
        bits: (1 << DType::I32 as u8)
            | (1 << DType::I16 as u8)
            | (1 << DType::I8 as u8)
            | (1 << DType::U32 as u8)
            | (1 << DType::U16 as u8)
            | (1 << DType::U8 as u8)
            | (1 << DType::F32 as u8)
            | (1 << DType::F16 as u8)
            | Self::QUANTIZED.bits,
    };

    /// Create a set containing a single dtype
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self {
            bits: 1 << dtype as u8,
        }
    }

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Intersection of two sets
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F16.size_in_bytes(), 2);
        assert_eq!(DType::I8.size_in_bytes(), 1);
        assert_eq!(DType::Bool.size_in_bytes(), 1);
        assert_eq!(DType::QAsymm8.size_in_bytes(), 1);
        assert_eq!(DType::QSymm16.size_in_bytes(), 2);
        assert_eq!(DType::QAsymm16.size_in_bytes(), 2);
    }

    #[test]
    fn test_dtype_categories() {
        assert!(DType::F32.is_float());
        assert!(!DType::I32.is_float());
        assert!(DType::I32.is_signed_int());
        assert!(DType::U32.is_unsigned_int());
        assert!(DType::QSymm8PerChannel.is_quantized());
        assert!(!DType::QSymm8PerChannel.is_int());
        assert!(!DType::U8.is_quantized());
    }

    #[test]
    fn test_storage_dtype() {
        assert_eq!(DType::QAsymm8.storage_dtype(), DType::U8);
        assert_eq!(DType::QAsymm8Signed.storage_dtype(), DType::I8);
        assert_eq!(DType::QSymm8.storage_dtype(), DType::I8);
        assert_eq!(DType::QSymm16.storage_dtype(), DType::I16);
        assert_eq!(DType::QAsymm16.storage_dtype(), DType::U16);
        assert_eq!(DType::F32.storage_dtype(), DType::F32);
        for dtype in [DType::QAsymm8, DType::QSymm16, DType::QAsymm16] {
            assert_eq!(dtype.size_in_bytes(), dtype.storage_dtype().size_in_bytes());
        }
    }

    #[test]
    fn test_dtype_set() {
        assert!(DTypeSet::FLOATS.contains(DType::F32));
        assert!(!DTypeSet::FLOATS.contains(DType::I32));
        assert!(DTypeSet::INTS.contains(DType::I32));
        assert!(DTypeSet::QUANTIZED.contains(DType::QAsymm16));
        assert!(DTypeSet::SPARSE_CONVERTIBLE.contains(DType::F16));
        assert!(DTypeSet::SPARSE_CONVERTIBLE.contains(DType::QSymm8));
        assert!(!DTypeSet::SPARSE_CONVERTIBLE.contains(DType::F64));
        assert!(!DTypeSet::SPARSE_CONVERTIBLE.contains(DType::BF16));
        assert!(!DTypeSet::SPARSE_CONVERTIBLE.contains(DType::I64));
        assert!(
            DTypeSet::single(DType::U8)
                .intersection(DTypeSet::FLOATS)
                .is_empty()
        );
        assert_eq!(
            DTypeSet::FLOATS.union(DTypeSet::INTS).intersection(DTypeSet::QUANTIZED),
            DTypeSet::EMPTY
        );
    }

    #[test]
    fn test_short_names() {
        assert_eq!(DType::QAsymm8Signed.short_name(), "qasymm8_signed");
        assert_eq!(DType::F16.to_string(), "f16");
    }
}
