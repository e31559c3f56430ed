//! Named constants for configuration values.
//!
//! This module centralizes layout widths and default values used throughout
//! the codebase, making them easier to find, document, and tune.

/// Constants for the on-disk and in-memory record layout.
pub mod layout {
    /// Width of a size field (capacity, stride, count) in a saved index.
    pub const SIZE_FIELD_BYTES: usize = 8;

    /// Number of size fields in the header of a saved index.
    pub const HEADER_FIELDS: usize = 3;

    /// Total header size in bytes: capacity, stride, count.
    pub const HEADER_SIZE: usize = SIZE_FIELD_BYTES * HEADER_FIELDS;
}

/// Constants for search.
pub mod search {
    /// Minimum number of queries per rayon task in batch search.
    /// Small batches are not worth splitting across threads.
    pub const BATCH_MIN_QUERIES_PER_TASK: usize = 4;
}

/// Constants for resource limits.
pub mod limits {
    /// Default maximum vectors per index.
    pub const DEFAULT_MAX_VECTORS: usize = 100_000_000;

    /// Default memory limit in bytes (8 GB).
    pub const DEFAULT_MEMORY_LIMIT: usize = 8 * 1024 * 1024 * 1024;
}
