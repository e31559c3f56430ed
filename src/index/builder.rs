//! Builder pattern for BruteForceIndex.
//!
//! # Example
//!
//! ```
//! use forge_knn::index::BruteForceIndexBuilder;
//! use forge_knn::{L2Space, ResourceLimits};
//!
//! let index = BruteForceIndexBuilder::new()
//!     .capacity(10_000)
//!     .limits(ResourceLimits::none().with_max_memory_bytes(64 * 1024 * 1024))
//!     .build(L2Space::new(128))
//!     .unwrap();
//! assert_eq!(index.capacity(), 10_000);
//! ```

use crate::error::{KnnError, Result};
use crate::metrics::ResourceLimits;
use crate::space::Space;

use super::BruteForceIndex;

/// Builder for constructing a [`BruteForceIndex`].
#[derive(Debug, Clone, Default)]
pub struct BruteForceIndexBuilder {
    /// Maximum number of points.
    capacity: Option<usize>,
    /// Limits checked before the arena is allocated.
    limits: ResourceLimits,
}

impl BruteForceIndexBuilder {
    /// Create a new builder with no capacity and no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of points.
    ///
    /// This is required for building the index.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the resource limits.
    ///
    /// Default: no limits.
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build an empty index over `space`.
    ///
    /// # Errors
    ///
    /// Returns an error if no capacity was set, a limit is exceeded, or the
    /// arena cannot be allocated.
    pub fn build<S: Space>(self, space: S) -> Result<BruteForceIndex<S>> {
        let capacity = self
            .capacity
            .ok_or_else(|| KnnError::invalid_parameter("capacity is required"))?;
        BruteForceIndex::with_limits(space, capacity, self.limits)
    }
}
