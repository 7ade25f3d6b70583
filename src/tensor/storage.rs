//! Storage: owned host memory backing dense and sparse tensors

use crate::dtype::Element;
use crate::error::{Error, Result};

/// Zero-initialised host byte buffer
///
/// Memory is held as 64-bit words so that the start of the buffer is
/// aligned for every element type, which lets typed views over a prefix of
/// the buffer be taken without copying. Cloning copies the bytes; dense
/// tensors share a `Storage` through an `Arc` instead.
#[derive(Clone, PartialEq, Eq)]
pub struct Storage {
    words: Vec<u64>,
    len: usize,
}

const WORD: usize = std::mem::size_of::<u64>();

impl Storage {
    /// Allocate `size_bytes` zeroed bytes
    ///
    /// Returns `OutOfMemory` if the host refuses the reservation.
    pub fn zeroed(size_bytes: usize) -> Result<Self> {
        let n_words = size_bytes.div_ceil(WORD);
        let mut words = Vec::new();
        words
            .try_reserve_exact(n_words)
            .map_err(|_| Error::OutOfMemory { size: size_bytes })?;
        words.resize(n_words, 0);
        Ok(Self {
            words,
            len: size_bytes,
        })
    }

    /// Copy raw bytes into fresh storage
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut storage = Self::zeroed(data.len())?;
        storage.as_bytes_mut().copy_from_slice(data);
        Ok(storage)
    }

    /// Copy typed elements into fresh storage
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        Self::from_bytes(bytemuck::cast_slice(data))
    }

    /// Get the bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len]
    }

    /// Get the bytes mutably
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..self.len]
    }

    /// Get the number of bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.len
    }

    /// Copy the bytes out as a vector of `T`
    ///
    /// Trailing bytes that do not fill a whole `T` are dropped.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        // Allocate with correct alignment for T, then copy bytes in. This
        // avoids alignment violations when the storage is a sub-region.
        let n = self.len / std::mem::size_of::<T>().max(1);
        let mut result = vec![T::zeroed(); n];
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        let filled = dst.len();
        dst.copy_from_slice(&self.as_bytes()[..filled]);
        result
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("len", &self.len).finish()
    }
}
