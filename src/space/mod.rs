//! Distance spaces: the vector size and metric an index is built against.
//!
//! An index never interprets vector payloads itself. It stores the bytes a
//! [`Space`] encodes and hands pairs of payloads back to
//! [`Space::distance`]. The space value doubles as the metric's parameter
//! block (dimension and anything else the kernel needs).

pub mod scalar;

use crate::error::{KnnError, Result};
use std::fmt;
use std::sync::Arc;

/// A fixed-width vector element that can be stored in a record.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Write the little-endian encoding into `out[..Self::SIZE]`.
    fn write_le(self, out: &mut [u8]);

    /// Read an element from `bytes[..Self::SIZE]`.
    fn read_le(bytes: &[u8]) -> Self;
}

impl Element for f32 {
    const SIZE: usize = 4;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Element for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = self;
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

/// Supplies the payload size and the distance function of an index.
///
/// Implementations must be pure: the same two payloads always produce the
/// same distance. Smaller distances mean closer vectors.
pub trait Space: Send + Sync {
    /// Element type of the vectors in this space.
    type Elem: Element;

    /// Number of elements per vector.
    fn dim(&self) -> usize;

    /// Byte size of one encoded vector payload.
    fn data_size(&self) -> usize {
        self.dim() * <Self::Elem as Element>::SIZE
    }

    /// Distance between two encoded payloads of [`data_size`](Self::data_size) bytes.
    fn distance(&self, a: &[u8], b: &[u8]) -> f32;

    /// Encode `vector` into `out`, which must be exactly `data_size()` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::DimensionMismatch`] if `vector.len() != dim()`.
    fn encode_into(&self, vector: &[Self::Elem], out: &mut [u8]) -> Result<()> {
        if vector.len() != self.dim() {
            return Err(KnnError::dimension_mismatch(self.dim(), vector.len()));
        }
        let width = <Self::Elem as Element>::SIZE;
        for (value, chunk) in vector.iter().zip(out.chunks_exact_mut(width)) {
            value.write_le(chunk);
        }
        Ok(())
    }

    /// Encode `vector` into a freshly allocated payload.
    fn encode(&self, vector: &[Self::Elem]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.data_size()];
        self.encode_into(vector, &mut out)?;
        Ok(out)
    }

    /// Decode a payload back into elements.
    fn decode(&self, bytes: &[u8]) -> Vec<Self::Elem> {
        bytes
            .chunks_exact(<Self::Elem as Element>::SIZE)
            .map(<Self::Elem as Element>::read_le)
            .collect()
    }
}

impl<S: Space + ?Sized> Space for &S {
    type Elem = S::Elem;

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn data_size(&self) -> usize {
        (**self).data_size()
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        (**self).distance(a, b)
    }
}

impl<S: Space + ?Sized> Space for Arc<S> {
    type Elem = S::Elem;

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn data_size(&self) -> usize {
        (**self).data_size()
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        (**self).distance(a, b)
    }
}

/// Squared Euclidean distance over f32 vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Space {
    dim: usize,
}

impl L2Space {
    /// Create a space for `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Space for L2Space {
    type Elem = f32;

    fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        scalar::l2_squared_f32(a, b)
    }
}

/// Inner-product distance (`1 - dot`) over f32 vectors.
///
/// Normalize vectors beforehand to get cosine distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerProductSpace {
    dim: usize,
}

impl InnerProductSpace {
    /// Create a space for `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Space for InnerProductSpace {
    type Elem = f32;

    fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        scalar::inner_product_distance_f32(a, b)
    }
}

/// Squared Euclidean distance over u8 vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2SpaceI {
    dim: usize,
}

impl L2SpaceI {
    /// Create a space for `dim`-dimensional byte vectors.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Space for L2SpaceI {
    type Elem = u8;

    fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        scalar::l2_squared_u8(a, b)
    }
}
