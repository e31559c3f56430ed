//! File format definitions for saved indexes.

use crate::constants::layout::{HEADER_SIZE, SIZE_FIELD_BYTES};
use crate::error::{KnnError, Result};

/// Header preceding the record arena in a saved index.
///
/// Total size: 24 bytes
/// ```text
/// [CAPACITY u64][STRIDE u64][COUNT u64]
/// ```
/// All fields little-endian, no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    /// Maximum number of records.
    pub capacity: usize,
    /// Record size in bytes when the index was saved.
    pub stride: usize,
    /// Number of live records.
    pub count: usize,
}

impl IndexHeader {
    /// Header size in bytes.
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a new header.
    pub fn new(capacity: usize, stride: usize, count: usize) -> Self {
        Self {
            capacity,
            stride,
            count,
        }
    }

    /// Size of the arena section that follows the header, or `None` on overflow.
    pub fn body_len(&self) -> Option<usize> {
        self.capacity.checked_mul(self.stride)
    }

    /// Serialize header to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&(self.capacity as u64).to_le_bytes());
        bytes[8..16].copy_from_slice(&(self.stride as u64).to_le_bytes());
        bytes[16..24].copy_from_slice(&(self.count as u64).to_le_bytes());
        bytes
    }

    /// Deserialize header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(KnnError::invalid_format("header too small"));
        }

        Ok(Self {
            capacity: read_size(&bytes[0..8], "capacity")?,
            stride: read_size(&bytes[8..16], "stride")?,
            count: read_size(&bytes[16..24], "count")?,
        })
    }
}

fn read_size(bytes: &[u8], field: &str) -> Result<usize> {
    let mut raw = [0u8; SIZE_FIELD_BYTES];
    raw.copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(raw))
        .map_err(|_| KnnError::invalid_format(format!("{field} does not fit in usize")))
}
