//! Shape type: dimensions of a tensor

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Coordinates of one element (or one slice) of a tensor, outermost axis first
pub type Coordinates = SmallVec<[usize; STACK_DIMS]>;

/// Shape type: dimensions of a tensor
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements
    ///
    /// A zero-dimensional shape describes a scalar and holds one element.
    /// Saturates at `usize::MAX` when the product overflows; tensor
    /// constructors reject such shapes through [`checked_elem_count`].
    ///
    /// [`checked_elem_count`]: Self::checked_elem_count
    #[inline]
    pub fn elem_count(&self) -> usize {
        saturating_product(&self.0)
    }

    /// Total number of elements, or `None` if the product overflows `usize`
    pub fn checked_elem_count(&self) -> Option<usize> {
        if self.0.contains(&0) {
            return Some(0);
        }
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Product of the extents from `axis` through the last axis
    ///
    /// `volume_from(ndim())` is the empty product, 1.
    #[inline]
    pub fn volume_from(&self, axis: usize) -> usize {
        self.0.get(axis..).map_or(1, saturating_product)
    }

    /// Split a linear index into per-axis coordinates over `self`
    ///
    /// Mixed-radix decomposition with the last axis varying fastest, so
    /// enumerating `0..elem_count()` walks the shape in lexicographic order.
    pub fn unravel(&self, mut linear: usize) -> Coordinates {
        let mut coords: Coordinates = SmallVec::from_elem(0, self.ndim());
        for (coord, &extent) in coords.iter_mut().zip(self.0.iter()).rev() {
            if extent == 0 {
                break;
            }
            *coord = linear % extent;
            linear /= extent;
        }
        coords
    }

    /// Row-major linear index of `coords`, or `None` when the arity or a
    /// component is out of range
    pub fn ravel(&self, coords: &[usize]) -> Option<usize> {
        if coords.len() != self.ndim() {
            return None;
        }
        let mut linear = 0usize;
        for (&c, &extent) in coords.iter().zip(self.0.iter()) {
            if c >= extent {
                return None;
            }
            linear = linear * extent + c;
        }
        Some(linear)
    }
}

// A zero extent anywhere still yields zero, since `MAX.saturating_mul(0) == 0`
fn saturating_product(extents: &[usize]) -> usize {
    extents.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl PartialEq<[usize]> for Shape {
    fn eq(&self, other: &[usize]) -> bool {
        self.0.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.0.as_slice() == other.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
