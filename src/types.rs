//! Core newtypes for type-safe index operations.
//!
//! External labels are what callers see; internal slots never leave the
//! index. Keeping them as distinct types prevents passing one for the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A caller-supplied identifier for a stored vector.
///
/// Unique among live points, stable for the point's lifetime, and free to be
/// reused once the point is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Label(pub u64);

impl Label {
    /// Width of a label in the record layout, in bytes.
    pub const SIZE: usize = std::mem::size_of::<u64>();

    /// Create a new Label.
    #[inline]
    pub const fn new(label: u64) -> Self {
        Self(label)
    }

    /// Get the raw u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Encode the label as it is stored after each vector payload.
    #[inline]
    pub const fn to_le_bytes(self) -> [u8; Self::SIZE] {
        self.0.to_le_bytes()
    }

    /// Decode a label from the trailing bytes of a record.
    ///
    /// `bytes` must hold at least [`Label::SIZE`] bytes.
    #[inline]
    pub fn from_le_slice(bytes: &[u8]) -> Self {
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(&bytes[..Self::SIZE]);
        Self(u64::from_le_bytes(raw))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.0)
    }
}

impl From<u64> for Label {
    #[inline]
    fn from(label: u64) -> Self {
        Self(label)
    }
}

impl From<Label> for u64 {
    #[inline]
    fn from(label: Label) -> Self {
        label.0
    }
}

/// Position of a record inside an index arena.
///
/// Reassigned whenever a removal compacts the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Slot(pub usize);
