//! Core Tensor type

use super::{DataLayout, Layout, Shape, Storage, TensorInfo};
use crate::dtype::{DType, Element, QuantizationInfo};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// N-dimensional dense array in host memory
///
/// `Tensor` is the dense source and destination of every sparse conversion.
/// It consists of:
/// - **TensorInfo**: Shape, element type, declared data layout, quantization
/// - **Layout**: Shape, strides, and offset defining the view into storage
/// - **Storage**: Reference-counted host bytes
///
/// # Zero-Copy Views
///
/// `transpose` creates a new tensor that shares the same underlying storage
/// with swapped strides. Such views are readable element by element but are
/// not row-major, so the sparse converters reject them.
///
/// # Example
///
/// ```
/// use sparsekit::prelude::*;
///
/// let a = Tensor::from_slice(&[1.0f32, 0.0, 0.0, 4.0], &[2, 2])?;
/// assert_eq!(a.shape(), &[2, 2]);
/// assert_eq!(a.dtype(), DType::F32);
/// # Ok::<(), sparsekit::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Tensor {
    /// Shape, dtype, data layout, quantization
    info: TensorInfo,
    /// Shape, strides, offset
    layout: Layout,
    /// Host memory
    storage: Arc<Storage>,
}

impl Tensor {
    /// Create a tensor from metadata, layout, and storage
    ///
    /// Returns an error if the layout shape differs from the metadata shape,
    /// or if the layout addresses elements beyond the end of the storage.
    pub fn from_parts(info: TensorInfo, layout: Layout, storage: Storage) -> Result<Self> {
        if info.shape().as_slice() != layout.shape() {
            return Err(Error::shape_mismatch(info.shape(), layout.shape()));
        }
        let needed = layout
            .required_elems()
            .ok_or_else(|| Error::invalid_input("layout uses negative strides or overflows"))?
            .checked_mul(info.element_size())
            .ok_or_else(|| Error::invalid_input("layout extent overflows usize"))?;
        if needed > storage.len() {
            return Err(Error::invalid_input(format!(
                "layout {layout:?} needs {needed} bytes but storage holds {}",
                storage.len()
            )));
        }
        Ok(Self {
            info,
            layout,
            storage: Arc::new(storage),
        })
    }

    /// Create a tensor from a slice of data
    ///
    /// Returns an error if `data.len()` does not equal the product of the
    /// `shape` dimensions, or if memory allocation fails.
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        let expected_len = Shape::from(shape).checked_elem_count();
        if expected_len != Some(data.len()) {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data)?;
        Self::from_parts(
            TensorInfo::new(shape, T::DTYPE),
            Layout::contiguous(shape),
            storage,
        )
    }

    /// Create a quantized tensor from its raw stored values
    ///
    /// `T` must be the storage type of `dtype` (e.g. `u8` for
    /// `DType::QAsymm8`).
    pub fn from_quantized_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        dtype: DType,
        quantization: QuantizationInfo,
    ) -> Result<Self> {
        if !dtype.is_quantized() {
            return Err(Error::invalid_input(format!(
                "{dtype} is not a quantized type"
            )));
        }
        if dtype.storage_dtype() != T::DTYPE {
            return Err(Error::DTypeMismatch {
                lhs: dtype.storage_dtype(),
                rhs: T::DTYPE,
            });
        }
        let tensor = Self::from_slice(data, shape)?;
        Ok(Self {
            info: TensorInfo::new(shape, dtype).with_quantization(quantization),
            ..tensor
        })
    }

    /// Create a tensor from raw row-major bytes with explicit dtype
    pub fn from_bytes(data: &[u8], shape: &[usize], dtype: DType) -> Result<Self> {
        let info = TensorInfo::new(shape, dtype);
        let expected = dense_size(&info)?;
        if data.len() != expected {
            return Err(Error::invalid_input(format!(
                "{} bytes cannot fill shape {shape:?} of {dtype} ({expected} bytes)",
                data.len()
            )));
        }
        Self::from_parts(info, Layout::contiguous(shape), Storage::from_bytes(data)?)
    }

    /// Create a tensor filled with zeros
    ///
    /// Returns `InvalidInput` if the byte size of `shape` overflows `usize`
    /// and `OutOfMemory` if the host cannot provide it.
    pub fn zeros(shape: &[usize], dtype: DType) -> Result<Self> {
        let info = TensorInfo::new(shape, dtype);
        let storage = Storage::zeroed(dense_size(&info)?)?;
        Self::from_parts(info, Layout::contiguous(shape), storage)
    }

    /// Replace the declared data layout tag
    pub fn with_data_layout(mut self, data_layout: DataLayout) -> Self {
        self.info = self.info.with_data_layout(data_layout);
        self
    }

    /// Replace the quantization info
    pub fn with_quantization(mut self, quantization: QuantizationInfo) -> Self {
        self.info = self.info.with_quantization(quantization);
        self
    }

    // ===== Accessors =====

    /// Get the tensor metadata
    #[inline]
    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        self.info.shape()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.info.dtype()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.info.num_dimensions()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.info.elem_count()
    }

    /// Size of one element in bytes
    #[inline]
    pub fn element_size(&self) -> usize {
        self.info.element_size()
    }

    /// Get the underlying storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Byte offset of the first logical element within the storage
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.layout.offset() * self.element_size()
    }

    /// Declared `Nchw` with row-major strides
    ///
    /// This is the only layout the sparse converters read.
    pub fn is_row_major(&self) -> bool {
        self.info.data_layout() == DataLayout::Nchw && self.layout.is_row_major()
    }

    /// Check that the tensor can be read as one canonical row-major buffer
    pub(crate) fn ensure_row_major(&self) -> Result<()> {
        if self.info.data_layout() != DataLayout::Nchw {
            return Err(Error::UnsupportedLayout {
                layout: self.info.data_layout(),
                reason: "only NCHW ordering is supported",
            });
        }
        if !self.layout.is_row_major() {
            return Err(Error::UnsupportedLayout {
                layout: self.info.data_layout(),
                reason: "strides are not row-major",
            });
        }
        Ok(())
    }

    // ===== Data access =====

    /// The tensor's elements as one row-major byte slice
    ///
    /// Starts at the tensor's byte offset and spans `numel() * element_size()`
    /// bytes. Fails for non-row-major views.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.ensure_row_major()?;
        let start = self.byte_offset();
        let end = start + self.info.total_size();
        Ok(&self.storage.as_bytes()[start..end])
    }

    /// Bytes of the element at `indices`, or `None` when out of bounds
    pub fn element_bytes(&self, indices: &[usize]) -> Option<&[u8]> {
        let elem = self.element_size();
        let start = self.layout.index(indices)? * elem;
        self.storage.as_bytes().get(start..start + elem)
    }

    /// Copy the elements out in logical row-major order
    ///
    /// `T` must match the storage type of the tensor's dtype.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let storage_dtype = self.dtype().storage_dtype();
        if storage_dtype != T::DTYPE {
            return Err(Error::DTypeMismatch {
                lhs: storage_dtype,
                rhs: T::DTYPE,
            });
        }
        let shape = self.shape();
        (0..self.numel())
            .map(|i| {
                let coords = shape.unravel(i);
                self.element_bytes(&coords)
                    .map(bytemuck::pod_read_unaligned::<T>)
                    .ok_or_else(|| Error::index_out_of_range(&coords, shape))
            })
            .collect()
    }

    // ===== Views =====

    /// Swap two dimensions without copying
    ///
    /// Supports negative indexing: -1 is the last dimension.
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let layout = self.layout.transpose(dim0, dim1).ok_or_else(|| {
            Error::invalid_input(format!(
                "cannot transpose dims ({dim0}, {dim1}) of a {}-D tensor",
                self.ndim()
            ))
        })?;
        let info = self.info.clone().with_shape(Shape::from(layout.shape()));
        Ok(Self {
            info,
            layout,
            storage: Arc::clone(&self.storage),
        })
    }
}

fn dense_size(info: &TensorInfo) -> Result<usize> {
    info.checked_total_size().ok_or_else(|| {
        Error::invalid_input(format!(
            "shape {:?} of {} overflows usize",
            info.shape().as_slice(),
            info.dtype()
        ))
    })
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape().as_slice())
            .field("dtype", &self.dtype())
            .field("data_layout", &self.info.data_layout())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, {})", self.shape().as_slice(), self.dtype())
    }
}
