//! Error types for forge-knn operations.
//!
//! Every fallible index operation has a `try_*` form returning [`Result`]
//! and a plain form that panics with the error's message. Both forms share
//! one code path; only the failure signaling differs.

use std::io;
use thiserror::Error;

/// Result type alias using [`KnnError`].
pub type Result<T> = std::result::Result<T, KnnError>;

/// Errors that can occur during index operations.
#[derive(Error, Debug)]
pub enum KnnError {
    /// A new label was inserted into an index that is already full.
    #[error("capacity exceeded: the index already holds {capacity} elements")]
    CapacityExceeded {
        /// Capacity of the index.
        capacity: usize,
    },

    /// The record arena could not be allocated.
    #[error("allocation failed: could not reserve {bytes} bytes for the record arena")]
    AllocationFailed {
        /// Bytes requested.
        bytes: usize,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Vector dimensions do not match the space's dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected vector dimension.
        expected: usize,
        /// Actual vector dimension provided.
        actual: usize,
    },

    /// Invalid parameter value provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Index file has an invalid or unrecognized format.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Index is corrupted or in an invalid state.
    #[error("index corrupted: {0}")]
    IndexCorrupted(String),

    /// Memory limit exceeded.
    #[error("memory limit exceeded: requested {requested} bytes, limit is {limit} bytes")]
    MemoryLimitExceeded {
        /// Bytes requested.
        requested: usize,
        /// Maximum bytes allowed.
        limit: usize,
    },

    /// Maximum vector count exceeded.
    #[error("vector limit exceeded: requested capacity {attempted}, limit is {limit}")]
    VectorLimitExceeded {
        /// Requested capacity.
        attempted: usize,
        /// Maximum vector count allowed.
        limit: usize,
    },
}

impl KnnError {
    /// Creates a new `CapacityExceeded` error.
    pub fn capacity_exceeded(capacity: usize) -> Self {
        Self::CapacityExceeded { capacity }
    }

    /// Creates a new `AllocationFailed` error.
    pub fn allocation_failed(bytes: usize) -> Self {
        Self::AllocationFailed { bytes }
    }

    /// Creates a new `DimensionMismatch` error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a new `InvalidParameter` error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates a new `InvalidFormat` error.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Creates a new `IndexCorrupted` error.
    pub fn index_corrupted(msg: impl Into<String>) -> Self {
        Self::IndexCorrupted(msg.into())
    }

    /// Creates a new `MemoryLimitExceeded` error.
    pub fn memory_limit_exceeded(requested: usize, limit: usize) -> Self {
        Self::MemoryLimitExceeded { requested, limit }
    }

    /// Creates a new `VectorLimitExceeded` error.
    pub fn vector_limit_exceeded(attempted: usize, limit: usize) -> Self {
        Self::VectorLimitExceeded { attempted, limit }
    }

    /// Returns true if this error reports a full index.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}
