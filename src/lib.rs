//! forge-knn: exact k-nearest-neighbor search over a pluggable distance space.
//!
//! This crate provides a thread-safe, capacity-bounded brute force index that
//! stores fixed-dimension vectors under caller-chosen labels and answers
//! "k nearest neighbors to this query" exactly.
//!
//! # Features
//!
//! - **Pluggable Spaces**: squared L2 and inner product over f32, squared L2 over u8
//! - **Index Contract**: the [`KnnIndex`] trait, with `try_*` primitives and panicking wrappers
//! - **Brute Force Index**: flat record arena, upsert, O(1) removal, pruned top-k scan
//! - **Filtering**: restrict results with any [`LabelFilter`]
//! - **Persistence**: compact binary save/load
//! - **Parallel Batch Search**: multi-core query batches with Rayon
//!
//! # Example
//!
//! ```
//! use forge_knn::{BruteForceIndex, KnnIndex, L2Space, Label};
//!
//! let index = BruteForceIndex::new(L2Space::new(4), 100).unwrap();
//! for i in 0..50u64 {
//!     index.add_point(&[i as f32, 0.0, 0.0, 0.0], Label(i), false);
//! }
//!
//! let hits = index.search_knn_closer_first(&[10.2, 0.0, 0.0, 0.0], 3, None);
//! let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
//! assert_eq!(labels, vec![10, 11, 9]);
//! ```

pub mod constants;
pub mod dataset;
pub mod error;
pub mod index;
pub mod metrics;
pub mod persistence;
pub mod space;
pub mod types;

// Re-export commonly used types at crate root
pub use dataset::{recall_at_k, Dataset};
pub use error::KnnError;
pub use index::{
    AcceptAll, AllowList, BruteForceIndex, BruteForceIndexBuilder, EpsilonSearchStopCondition,
    FurthestFirst, KnnIndex, LabelFilter, Neighbor, SearchStopCondition,
};
pub use metrics::{IndexStatistics, ResourceLimits, SearchStatistics};
pub use space::{Element, InnerProductSpace, L2Space, L2SpaceI, Space};
pub use types::Label;
