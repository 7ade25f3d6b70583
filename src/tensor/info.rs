//! Tensor metadata shared by dense and sparse tensors

use super::{DataLayout, Shape};
use crate::dtype::{DType, QuantizationInfo};

/// Metadata describing a tensor independently of its storage
///
/// Dense tensors and every sparse encoding expose the same `TensorInfo`, so
/// a sparse tensor reports the shape, type and quantization of the dense
/// tensor it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorInfo {
    shape: Shape,
    dtype: DType,
    data_layout: DataLayout,
    quantization: QuantizationInfo,
    is_sparse: bool,
}

impl TensorInfo {
    /// Dense, unquantized metadata in the canonical layout
    pub fn new(shape: impl Into<Shape>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
            data_layout: DataLayout::Nchw,
            quantization: QuantizationInfo::default(),
            is_sparse: false,
        }
    }

    /// Set the declared data layout
    pub fn with_data_layout(mut self, data_layout: DataLayout) -> Self {
        self.data_layout = data_layout;
        self
    }

    /// Set the quantization info
    pub fn with_quantization(mut self, quantization: QuantizationInfo) -> Self {
        self.quantization = quantization;
        self
    }

    /// Set or clear the sparse-encoding flag
    pub fn with_sparse(mut self, is_sparse: bool) -> Self {
        self.is_sparse = is_sparse;
        self
    }

    pub(crate) fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Dimensions
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Declared physical layout
    #[inline]
    pub fn data_layout(&self) -> DataLayout {
        self.data_layout
    }

    /// Quantization metadata
    #[inline]
    pub fn quantization(&self) -> &QuantizationInfo {
        &self.quantization
    }

    /// True for metadata owned by a sparse encoding
    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.is_sparse
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Size of one element in bytes
    #[inline]
    pub fn element_size(&self) -> usize {
        self.dtype.size_in_bytes()
    }

    /// Size of the dense representation in bytes
    ///
    /// Saturates at `usize::MAX`; see [`checked_total_size`](Self::checked_total_size).
    #[inline]
    pub fn total_size(&self) -> usize {
        self.elem_count().saturating_mul(self.element_size())
    }

    /// Size of the dense representation in bytes, or `None` on overflow
    pub fn checked_total_size(&self) -> Option<usize> {
        self.shape.checked_elem_count()?.checked_mul(self.element_size())
    }
}
