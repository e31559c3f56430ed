//! Metrics and statistics for index monitoring.
//!
//! Provides statistics about index state and search operations for
//! performance monitoring, capacity planning, and debugging.
//!
//! # Index Statistics
//!
//! Use [`IndexStatistics`] to understand the current state of your index:
//!
//! ```
//! use forge_knn::{BruteForceIndex, L2Space};
//!
//! let index = BruteForceIndex::new(L2Space::new(16), 1000).unwrap();
//! let stats = index.statistics();
//! assert_eq!(stats.capacity, 1000);
//! println!("{}", stats.summary());
//! ```
//!
//! # Search Statistics
//!
//! [`SearchStatistics`] shows how much of the scan the `lastdist` bound
//! pruned:
//!
//! ```ignore
//! let (results, stats) = index.search_with_stats(&query, 10, None)?;
//! println!("{} of {} candidates pruned", stats.candidates_pruned, stats.vectors_scanned);
//! ```
//!
//! # Resource Limits
//!
//! Use [`ResourceLimits`] to cap what an arena allocation may request:
//!
//! ```
//! use forge_knn::ResourceLimits;
//!
//! let limits = ResourceLimits::none()
//!     .with_max_memory_bytes(100 * 1024 * 1024)  // 100 MB
//!     .with_max_vectors(1_000_000);
//! assert!(limits.check_arena(1_000, 1_000 * 72).is_ok());
//! ```

use crate::error::{KnnError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resource limits applied whenever an index allocates its arena.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum arena size in bytes.
    pub max_memory_bytes: Option<usize>,
    /// Maximum capacity (record count) of an index.
    pub max_vectors: Option<usize>,
}

impl ResourceLimits {
    /// Create new resource limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Limits matching the crate defaults in [`crate::constants::limits`].
    pub fn defaults() -> Self {
        Self {
            max_memory_bytes: Some(crate::constants::limits::DEFAULT_MEMORY_LIMIT),
            max_vectors: Some(crate::constants::limits::DEFAULT_MAX_VECTORS),
        }
    }

    /// Set the maximum memory limit.
    pub fn with_max_memory_bytes(mut self, max_bytes: usize) -> Self {
        self.max_memory_bytes = Some(max_bytes);
        self
    }

    /// Set the maximum vector limit.
    pub fn with_max_vectors(mut self, max_vectors: usize) -> Self {
        self.max_vectors = Some(max_vectors);
        self
    }

    /// Check an arena of `capacity` records totalling `bytes` against the limits.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::VectorLimitExceeded`] or
    /// [`KnnError::MemoryLimitExceeded`] when a limit is exceeded.
    pub fn check_arena(&self, capacity: usize, bytes: usize) -> Result<()> {
        if let Some(limit) = self.max_vectors {
            if capacity > limit {
                return Err(KnnError::vector_limit_exceeded(capacity, limit));
            }
        }
        if let Some(limit) = self.max_memory_bytes {
            if bytes > limit {
                return Err(KnnError::memory_limit_exceeded(bytes, limit));
            }
        }
        Ok(())
    }
}

/// Statistics about the current state of an exact index.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IndexStatistics {
    /// Number of live points.
    pub num_vectors: usize,
    /// Maximum number of points.
    pub capacity: usize,
    /// Vector dimension.
    pub dimension: usize,
    /// Bytes per record (payload plus label).
    pub record_size: usize,
    /// Arena size in bytes.
    pub memory_bytes: usize,
    /// Live points as a fraction of capacity.
    pub fill_ratio: f32,
}

impl IndexStatistics {
    /// Create a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "IndexStatistics:\n  \
             Vectors: {} / {} ({:.1}% full)\n  \
             Dimension: {}, Record size: {} bytes\n  \
             Memory: {:.2} MB",
            self.num_vectors,
            self.capacity,
            self.fill_ratio * 100.0,
            self.dimension,
            self.record_size,
            self.memory_bytes as f64 / (1024.0 * 1024.0),
        )
    }
}

/// Statistics about a single search operation.
#[derive(Clone, Debug, Default)]
pub struct SearchStatistics {
    /// Total query execution time.
    pub query_time: Duration,
    /// Number of live records scanned.
    pub vectors_scanned: usize,
    /// Number of distance computations performed.
    pub distances_computed: usize,
    /// Candidates skipped because they could not enter a full result.
    pub candidates_pruned: usize,
    /// Candidates rejected by the label filter.
    pub vectors_filtered: usize,
}

impl SearchStatistics {
    /// Get query time in milliseconds.
    pub fn query_time_ms(&self) -> f32 {
        self.query_time.as_secs_f32() * 1000.0
    }

    /// Create a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "SearchStatistics:\n  \
             Time: {:.3}ms\n  \
             Vectors scanned: {}\n  \
             Distances computed: {}\n  \
             Candidates pruned: {}\n  \
             Vectors filtered: {}",
            self.query_time_ms(),
            self.vectors_scanned,
            self.distances_computed,
            self.candidates_pruned,
            self.vectors_filtered
        )
    }
}

/// Builder for collecting search statistics during a search operation.
#[derive(Default)]
pub struct SearchStatsBuilder {
    stats: SearchStatistics,
}

impl SearchStatsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the count of records scanned.
    pub fn add_vectors_scanned(&mut self, count: usize) {
        self.stats.vectors_scanned += count;
    }

    /// Add to the count of distances computed.
    pub fn add_distances(&mut self, count: usize) {
        self.stats.distances_computed += count;
    }

    /// Add to the count of pruned candidates.
    pub fn add_pruned(&mut self, count: usize) {
        self.stats.candidates_pruned += count;
    }

    /// Add to the count of filtered vectors.
    pub fn add_filtered(&mut self, count: usize) {
        self.stats.vectors_filtered += count;
    }

    /// Set the query execution time.
    pub fn set_query_time(&mut self, duration: Duration) {
        self.stats.query_time = duration;
    }

    /// Build the final statistics.
    pub fn build(self) -> SearchStatistics {
        self.stats
    }
}
