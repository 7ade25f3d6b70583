//! Layout: shape, strides, and offset for tensor memory layout

use super::shape::{STACK_DIMS, Shape};
use smallvec::SmallVec;
use std::fmt;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed so that views can describe reversed axes
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Declared physical ordering of a tensor's dimensions
///
/// The tag is metadata: it records which axis order the producer used when
/// it wrote the buffer. The sparse converters only accept `Nchw`, the
/// canonical outermost-first ordering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataLayout {
    /// Batch, channels, height, width: canonical row-major order
    #[default]
    Nchw,
    /// Batch, height, width, channels: channels-last order
    Nhwc,
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nchw => f.write_str("NCHW"),
            Self::Nhwc => f.write_str("NHWC"),
        }
    }
}

/// Layout describes the memory layout of a tensor
///
/// A tensor's elements are stored in a contiguous buffer, but not necessarily
/// in row-major order. The layout specifies how to compute the memory address
/// of any element given its indices.
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    /// Shape: size along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
    /// Offset: starting element index in the underlying storage
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use sparsekit::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape = Shape::from(shape);
        let strides = Self::compute_contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    ///
    /// Returns `None` if `shape` and `strides` disagree in rank.
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Option<Self> {
        if shape.ndim() != strides.len() {
            return None;
        }
        Some(Self {
            shape,
            strides,
            offset,
        })
    }

    /// Same layout, starting `offset` elements into the storage
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Compute contiguous strides for a given shape (row-major order)
    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;

        // Compute strides from last dimension to first
        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride = stride.saturating_mul(isize::try_from(dim).unwrap_or(isize::MAX));
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Check if the tensor is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Row-major strides, at any offset
    ///
    /// Axes of extent 1 may carry any stride since they are never stepped.
    pub fn is_row_major(&self) -> bool {
        let expected = Self::compute_contiguous_strides(&self.shape);
        self.strides
            .iter()
            .zip(expected.iter())
            .zip(self.shape.iter())
            .all(|((&got, &want), &extent)| extent <= 1 || got == want)
    }

    /// Row-major strides starting at offset zero
    pub fn is_contiguous(&self) -> bool {
        self.is_row_major() && self.offset == 0
    }

    /// Get size along a specific dimension
    ///
    /// Supports negative indexing: -1 is the last dimension
    pub fn dim(&self, d: isize) -> Option<usize> {
        let idx = self.normalize_dim(d)?;
        Some(self.shape[idx])
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Compute the linear index (element offset) for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        // Check bounds
        for (idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if *idx >= dim {
                return None;
            }
        }

        let mut linear = self.offset as isize;
        for (&idx, &stride) in indices.iter().zip(self.strides.iter()) {
            linear += idx as isize * stride;
        }

        usize::try_from(linear).ok()
    }

    /// Create a transposed layout (swap two dimensions)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;

        let mut new_shape = self.shape.to_vec();
        let mut new_strides = self.strides.clone();

        new_shape.swap(d0, d1);
        new_strides.swap(d0, d1);

        Some(Self {
            shape: Shape::from(new_shape),
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Largest element index any valid coordinate reaches, plus one
    ///
    /// Zero for an empty tensor. Used to check that a layout fits its storage.
    pub(crate) fn required_elems(&self) -> Option<usize> {
        if self.elem_count() == 0 {
            return Some(0);
        }
        let mut last = isize::try_from(self.offset).ok()?;
        for (&extent, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if stride < 0 {
                return None;
            }
            let reach = isize::try_from(extent - 1).ok()?.checked_mul(stride)?;
            last = last.checked_add(reach)?;
        }
        usize::try_from(last.checked_add(1)?).ok()
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_layout() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.shape(), &[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.elem_count(), 24);
        assert!(layout.is_contiguous());
        assert!(layout.is_row_major());
    }

    #[test]
    fn test_scalar_layout() {
        let layout = Layout::contiguous(&[]);
        assert!(layout.is_scalar());
        assert_eq!(layout.elem_count(), 1);
        assert!(layout.is_contiguous());
    }

    #[test]
    fn test_transpose() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        let transposed = layout.transpose(-1, -2).unwrap();
        assert_eq!(transposed.shape(), &[2, 4, 3]);
        assert_eq!(transposed.strides(), &[12, 1, 4]);
        assert!(!transposed.is_contiguous());
        assert!(!transposed.is_row_major());
    }

    #[test]
    fn test_offset_is_row_major_but_not_contiguous() {
        let layout = Layout::contiguous(&[2, 2]).with_offset(3);
        assert!(layout.is_row_major());
        assert!(!layout.is_contiguous());
        assert_eq!(layout.index(&[1, 1]), Some(6));
        assert_eq!(layout.required_elems(), Some(7));
    }

    #[test]
    fn test_unit_axes_ignore_stride() {
        let shape = Shape::from([1, 3]);
        let strides: Strides = SmallVec::from_slice(&[99, 1]);
        let layout = Layout::new(shape, strides, 0).unwrap();
        assert!(layout.is_row_major());
    }

    #[test]
    fn test_new_rank_mismatch() {
        let strides: Strides = SmallVec::from_slice(&[1]);
        assert!(Layout::new(Shape::from([2, 2]), strides, 0).is_none());
    }

    #[test]
    fn test_index() {
        let layout = Layout::contiguous(&[2, 3]);
        assert_eq!(layout.index(&[0, 0]), Some(0));
        assert_eq!(layout.index(&[0, 2]), Some(2));
        assert_eq!(layout.index(&[1, 0]), Some(3));
        assert_eq!(layout.index(&[1, 2]), Some(5));
        assert_eq!(layout.index(&[2, 0]), None); // Out of bounds
    }

    #[test]
    fn test_data_layout_default() {
        assert_eq!(DataLayout::default(), DataLayout::Nchw);
        assert_eq!(DataLayout::Nhwc.to_string(), "NHWC");
    }
}
