//! Behaviour shared by every sparse encoding

use super::SparseFormat;
use super::predicate::NonzeroPredicate;
use crate::dtype::{DType, DTypeSet, Element};
use crate::error::{Error, Result};
use crate::tensor::{Coordinates, Shape, Tensor, TensorInfo};
use std::fmt;

/// Split of a tensor's axes into a sparse prefix and a dense suffix
///
/// The first `sparse_dim` axes are indexed by stored coordinates; the
/// remaining `dense_dim()` axes are stored densely inside each slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseDims {
    total_dim: usize,
    sparse_dim: usize,
}

impl SparseDims {
    /// Validate `1 <= sparse_dim <= total_dim`
    pub fn new(total_dim: usize, sparse_dim: usize) -> Result<Self> {
        if sparse_dim == 0 || sparse_dim > total_dim {
            return Err(Error::invalid_input(format!(
                "sparse_dim {sparse_dim} must lie in [1, {total_dim}]"
            )));
        }
        Ok(Self {
            total_dim,
            sparse_dim,
        })
    }

    /// Rank of the original dense tensor
    #[inline]
    pub fn total_dim(&self) -> usize {
        self.total_dim
    }

    /// Number of leading sparse axes
    #[inline]
    pub fn sparse_dim(&self) -> usize {
        self.sparse_dim
    }

    /// Number of trailing dense axes
    #[inline]
    pub fn dense_dim(&self) -> usize {
        self.total_dim - self.sparse_dim
    }

    /// True when each stored slice holds more than a scalar axis-wise
    #[inline]
    pub fn is_hybrid(&self) -> bool {
        self.dense_dim() > 0
    }
}

/// Common interface of sparse tensors built from a dense tensor
///
/// Sparse tensors are immutable once built and exclusively own their
/// storage. Lookups that land on an implicit zero return `Ok(None)`.
pub trait SparseTensor: fmt::Debug + Send + Sync {
    /// Encoding of this tensor
    fn format(&self) -> SparseFormat;

    /// Sparse/dense axis split
    fn dims(&self) -> SparseDims;

    /// Metadata of the dense tensor this encodes, flagged sparse
    fn info(&self) -> &TensorInfo;

    /// Number of stored entries
    ///
    /// Retained slices for COO, nonzero scalars for CSR.
    fn nnz(&self) -> usize;

    /// Raw bytes of the owned storage
    fn buffer(&self) -> &[u8];

    /// Rebuild the dense tensor
    fn to_dense(&self) -> Result<Tensor>;

    /// Coordinates of the `nth` stored entry
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `nth >= nnz()`.
    fn get_coordinates(&self, nth: usize) -> Result<Coordinates>;

    /// Bytes stored at `coords`, or `None` for an implicit zero
    fn get_value(&self, coords: &[usize]) -> Result<Option<&[u8]>>;

    /// Write a human-readable dump of the stored entries
    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Bytes held by this tensor, including in-memory coordinates
    fn memory_usage(&self) -> usize;

    /// Number of leading sparse axes
    #[inline]
    fn sparse_dim(&self) -> usize {
        self.dims().sparse_dim()
    }

    /// Number of trailing dense axes
    #[inline]
    fn dense_dim(&self) -> usize {
        self.dims().dense_dim()
    }

    /// Rank of the original dense tensor
    #[inline]
    fn dim(&self) -> usize {
        self.dims().total_dim()
    }

    /// True when `dense_dim() > 0`
    #[inline]
    fn is_hybrid(&self) -> bool {
        self.dims().is_hybrid()
    }

    /// Shape of the original dense tensor
    #[inline]
    fn shape(&self) -> &Shape {
        self.info().shape()
    }

    /// Element type
    #[inline]
    fn dtype(&self) -> DType {
        self.info().dtype()
    }

    /// Returns the density ratio
    ///
    /// Density = nnz / total_elements. An empty tensor has density 0.0.
    fn density(&self) -> f64 {
        let total = self.info().elem_count();
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Returns the sparsity ratio
    ///
    /// Sparsity = 1.0 - density
    #[inline]
    fn sparsity(&self) -> f64 {
        1.0 - self.density()
    }

    /// Product of the extents from `axis` through the last axis
    ///
    /// `dense_volume(sparse_dim())` is the number of elements per slice.
    #[inline]
    fn dense_volume(&self, axis: usize) -> usize {
        self.shape().volume_from(axis)
    }

    /// Typed lookup of a single element
    ///
    /// `T` must be the storage type of `dtype()`, and `coords` must select
    /// exactly one element.
    fn get_value_as<T: Element>(&self, coords: &[usize]) -> Result<Option<T>>
    where
        Self: Sized,
    {
        let stored = self.dtype().storage_dtype();
        if stored != T::DTYPE {
            return Err(Error::DTypeMismatch {
                lhs: stored,
                rhs: T::DTYPE,
            });
        }
        match self.get_value(coords)? {
            None => Ok(None),
            Some(bytes) if bytes.len() == std::mem::size_of::<T>() => {
                Ok(Some(bytemuck::pod_read_unaligned(bytes)))
            }
            Some(bytes) => Err(Error::invalid_input(format!(
                "coordinates {coords:?} select {} elements, not one",
                bytes.len() / std::mem::size_of::<T>()
            ))),
        }
    }
}

/// Check a dense tensor can be read by a sparse converter
///
/// Layout is checked before the sparse flag so that a misdeclared source
/// reports the more specific error.
pub(crate) fn ensure_dense_source(dense: &Tensor) -> Result<()> {
    dense.ensure_row_major()?;
    if dense.info().is_sparse() {
        return Err(Error::invalid_input(
            "source tensor is already flagged as sparse",
        ));
    }
    Ok(())
}

/// True if any element of `buffer` satisfies `predicate`
///
/// Scans `buffer.len() / element_size` elements and stops at the first
/// nonzero. An empty buffer (or a zero `element_size`) has no nonzeros.
pub fn has_non_zero_elements(
    buffer: &[u8],
    element_size: usize,
    predicate: NonzeroPredicate,
) -> bool {
    if element_size == 0 {
        return false;
    }
    buffer.chunks_exact(element_size).any(predicate)
}

/// Format `count` elements of `dtype` starting at byte `offset` of `data`
///
/// Values are separated by single spaces. Requests reaching past the end of
/// `data` and element types a sparse tensor cannot hold print a placeholder
/// instead of failing.
pub fn print_values(
    out: &mut dyn fmt::Write,
    data: &[u8],
    offset: usize,
    count: usize,
    dtype: DType,
) -> fmt::Result {
    if !DTypeSet::SPARSE_CONVERTIBLE.contains(dtype) {
        log::warn!("print_values: no formatter for {dtype}");
        return write!(out, "<unsupported {dtype}>");
    }
    let elem = dtype.size_in_bytes();
    let bytes = count
        .checked_mul(elem)
        .and_then(|len| offset.checked_add(len))
        .and_then(|end| data.get(offset..end));
    let Some(bytes) = bytes else {
        log::warn!(
            "print_values: {count} x {dtype} at byte {offset} exceeds {} bytes",
            data.len()
        );
        return out.write_str("<out of range>");
    };

    for (i, chunk) in bytes.chunks_exact(elem).enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write_element(out, chunk, dtype)?;
    }
    Ok(())
}

fn write_element(out: &mut dyn fmt::Write, b: &[u8], dtype: DType) -> fmt::Result {
    use bytemuck::pod_read_unaligned as read;

    match dtype.storage_dtype() {
        DType::U8 => write!(out, "{}", read::<u8>(b)),
        DType::I8 => write!(out, "{}", read::<i8>(b)),
        DType::U16 => write!(out, "{}", read::<u16>(b)),
        DType::I16 => write!(out, "{}", read::<i16>(b)),
        DType::U32 => write!(out, "{}", read::<u32>(b)),
        DType::I32 => write!(out, "{}", read::<i32>(b)),
        DType::F32 => write!(out, "{}", read::<f32>(b)),
        DType::F16 => {
            let bits = read::<u16>(b);
            #[cfg(feature = "f16")]
            {
                write!(out, "{}", half::f16::from_bits(bits))
            }
            #[cfg(not(feature = "f16"))]
            {
                write!(out, "{bits:#06x}")
            }
        }
        _ => out.write_char('?'),
    }
}
