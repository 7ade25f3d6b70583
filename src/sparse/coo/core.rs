//! Core COO implementation: struct, getters, lookups

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::sparse::{SparseDims, SparseFormat, SparseTensor, print_values};
use crate::tensor::{Coordinates, Shape, Storage, Tensor, TensorInfo};
use std::fmt;

/// COO (Coordinate) sparse tensor
///
/// The tensor's axes are split into a sparse prefix of `sparse_dim` axes and
/// a dense suffix. Every point of the sparse prefix addresses a *slice* of
/// `dense_volume(sparse_dim)` elements; a slice is stored if any of its
/// elements is nonzero. With `sparse_dim == dim()` every slice is a single
/// scalar.
///
/// Coordinates are kept in lexicographic order (last sparse axis fastest),
/// which is the order in which the dense tensor is scanned.
///
/// The owned allocation is sized for the slice values followed by an `i32`
/// index region of `nnz * sparse_dim` entries. Values occupy the front of
/// the allocation; the coordinates themselves are read from `indices`.
#[derive(Debug, Clone)]
pub struct CooTensor {
    pub(crate) info: TensorInfo,
    pub(crate) dims: SparseDims,
    pub(crate) indices: Vec<Coordinates>,
    pub(crate) storage: Storage,
}

impl CooTensor {
    /// Coordinates of every stored slice, in storage order
    pub fn indices(&self) -> &[Coordinates] {
        &self.indices
    }

    /// Raw bytes of every stored slice, back to back
    pub fn values(&self) -> &[u8] {
        &self.storage.as_bytes()[..self.nnz() * self.slice_len()]
    }

    /// Stored values as a typed slice
    ///
    /// `T` must be the storage type of the tensor's dtype.
    pub fn values_as<T: Element>(&self) -> Result<&[T]> {
        let stored = self.info.dtype().storage_dtype();
        if stored != T::DTYPE {
            return Err(Error::DTypeMismatch {
                lhs: stored,
                rhs: T::DTYPE,
            });
        }
        bytemuck::try_cast_slice(self.values())
            .map_err(|e| Error::invalid_input(format!("cannot view COO values: {e}")))
    }

    /// Number of bytes in one stored slice
    #[inline]
    pub(crate) fn slice_len(&self) -> usize {
        self.dense_volume(self.dims.sparse_dim()) * self.info.element_size()
    }

    /// Bytes of the `n`th stored slice
    #[inline]
    pub(crate) fn slice_bytes(&self, n: usize) -> &[u8] {
        let len = self.slice_len();
        &self.values()[n * len..(n + 1) * len]
    }
}

impl SparseTensor for CooTensor {
    fn format(&self) -> SparseFormat {
        SparseFormat::Coo
    }

    fn dims(&self) -> SparseDims {
        self.dims
    }

    fn info(&self) -> &TensorInfo {
        &self.info
    }

    fn nnz(&self) -> usize {
        self.indices.len()
    }

    fn buffer(&self) -> &[u8] {
        self.values()
    }

    fn to_dense(&self) -> Result<Tensor> {
        self.scatter_to_dense()
    }

    fn get_coordinates(&self, nth: usize) -> Result<Coordinates> {
        self.indices
            .get(nth)
            .cloned()
            .ok_or_else(|| Error::index_out_of_range(&[nth], &[self.nnz()]))
    }

    /// Lookup by sparse-prefix or full coordinates
    ///
    /// With `sparse_dim()` components the whole slice is returned; with
    /// `dim()` components the single element at the dense-suffix position
    /// within that slice is returned. A slice that was not stored is an
    /// implicit zero.
    fn get_value(&self, coords: &[usize]) -> Result<Option<&[u8]>> {
        let shape = self.shape();
        let sparse_dim = self.dims.sparse_dim();
        let arity_ok = coords.len() == sparse_dim || coords.len() == self.dims.total_dim();
        if !arity_ok || coords.iter().zip(shape.iter()).any(|(&c, &e)| c >= e) {
            return Err(Error::index_out_of_range(coords, shape));
        }

        let (prefix, suffix) = coords.split_at(sparse_dim);
        let Ok(n) = self
            .indices
            .binary_search_by(|idx| idx.as_slice().cmp(prefix))
        else {
            return Ok(None);
        };
        let slice = self.slice_bytes(n);
        if suffix.is_empty() {
            return Ok(Some(slice));
        }

        let elem = self.info.element_size();
        let within = Shape::from(&shape[sparse_dim..])
            .ravel(suffix)
            .ok_or_else(|| Error::index_out_of_range(coords, shape))?;
        Ok(slice.get(within * elem..(within + 1) * elem))
    }

    fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            out,
            "COO {} {:?} sparse_dim={} nnz={}",
            self.info.dtype(),
            self.shape().as_slice(),
            self.dims.sparse_dim(),
            self.nnz()
        )?;
        let per_slice = self.dense_volume(self.dims.sparse_dim());
        let len = self.slice_len();
        for (n, coord) in self.indices.iter().enumerate() {
            write!(out, "  {:?}: ", coord.as_slice())?;
            print_values(out, self.values(), n * len, per_slice, self.info.dtype())?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn memory_usage(&self) -> usize {
        self.storage.len()
            + self.indices.len() * self.dims.sparse_dim() * std::mem::size_of::<usize>()
    }
}

impl fmt::Display for CooTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f)
    }
}
