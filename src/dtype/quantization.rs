//! Quantization metadata attached to quantized tensors

/// Scale and zero-point offset of a quantized tensor
///
/// A uniform tensor carries a single `(scale, offset)` pair; a per-channel
/// tensor carries one scale per channel (and usually no offsets). The dense
/// ⇄ sparse conversions never interpret these values, they only carry them
/// across.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantizationInfo {
    scale: Vec<f32>,
    offset: Vec<i32>,
}

impl QuantizationInfo {
    /// Per-tensor quantization with one scale and one zero point
    pub fn uniform(scale: f32, offset: i32) -> Self {
        Self {
            scale: vec![scale],
            offset: vec![offset],
        }
    }

    /// Per-channel symmetric quantization
    pub fn per_channel(scales: Vec<f32>) -> Self {
        Self {
            scale: scales,
            offset: Vec::new(),
        }
    }

    /// Arbitrary per-channel scales and offsets
    pub fn from_parts(scale: Vec<f32>, offset: Vec<i32>) -> Self {
        Self { scale, offset }
    }

    /// Scale factors
    #[inline]
    pub fn scale(&self) -> &[f32] {
        &self.scale
    }

    /// Zero-point offsets
    #[inline]
    pub fn offset(&self) -> &[i32] {
        &self.offset
    }

    /// True when no scale has been set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scale.is_empty()
    }

    /// True for a single scale shared by the whole tensor
    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.scale.len() == 1
    }
}
