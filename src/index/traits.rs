//! The contract every index variant implements.
//!
//! Each fallible operation comes in two forms: a `try_*` primitive returning
//! [`Result`], and a convenience form that calls the primitive and panics on
//! failure. Implementers supply the primitives; the convenience forms and the
//! closest-first search are derived here and need no override.

use crate::error::Result;
use crate::index::filter::LabelFilter;
use crate::space::Element;
use crate::types::Label;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::path::Path;

/// A search hit: a label and its distance to the query.
///
/// Ordered by distance (`total_cmp`), then by label, so that in a
/// [`BinaryHeap`] the furthest hit sits on top and ties resolve towards
/// smaller labels being nearer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Neighbor {
    /// Distance from the query vector.
    pub distance: f32,
    /// Label of the matched point.
    pub label: Label,
}

impl Neighbor {
    /// Create a new Neighbor.
    #[inline]
    pub fn new(distance: f32, label: impl Into<Label>) -> Self {
        Self {
            distance,
            label: label.into(),
        }
    }

    /// Convert to a raw `(distance, label)` tuple.
    #[inline]
    pub fn to_tuple(self) -> (f32, u64) {
        (self.distance, self.label.0)
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl From<(f32, u64)> for Neighbor {
    fn from((distance, label): (f32, u64)) -> Self {
        Self::new(distance, label)
    }
}

/// Search output with the furthest hit on top.
pub type FurthestFirst = BinaryHeap<Neighbor>;

/// Common interface for nearest-neighbor indices.
///
/// Callers may hold a `&dyn KnnIndex<Elem = f32>` and stay agnostic of the
/// concrete variant.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; every method takes `&self` and
/// synchronizes internally.
pub trait KnnIndex: Send + Sync {
    /// Element type of stored vectors.
    type Elem: Element;

    /// Return the dimensionality of vectors in this index.
    fn dim(&self) -> usize;

    /// Return the number of live points.
    fn len(&self) -> usize;

    /// Return true if the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `vector` under `label`, or overwrite the vector if the label
    /// is already present.
    ///
    /// `replace_deleted` lets variants with soft deletion reuse a deleted
    /// point's storage; variants without soft deletion ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension does not match or a new label does
    /// not fit.
    fn try_add_point(&self, vector: &[Self::Elem], label: Label, replace_deleted: bool) -> Result<()>;

    /// Panicking form of [`try_add_point`](Self::try_add_point).
    ///
    /// # Panics
    ///
    /// Panics with the error message if the insert fails.
    fn add_point(&self, vector: &[Self::Elem], label: Label, replace_deleted: bool) {
        if let Err(err) = self.try_add_point(vector, label, replace_deleted) {
            panic!("{err}");
        }
    }

    /// Search for the `k` nearest neighbors of `query`.
    ///
    /// Returns a heap whose top is the furthest of the hits. Only labels the
    /// filter allows are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query dimension does not match.
    fn try_search_knn(
        &self,
        query: &[Self::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<FurthestFirst>;

    /// Panicking form of [`try_search_knn`](Self::try_search_knn).
    ///
    /// # Panics
    ///
    /// Panics with the error message if the search fails.
    fn search_knn(
        &self,
        query: &[Self::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> FurthestFirst {
        self.try_search_knn(query, k, filter)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Search for the `k` nearest neighbors, closest first.
    ///
    /// Derived from [`try_search_knn`](Self::try_search_knn) by popping the
    /// furthest hit into the back of the output until the heap is empty.
    fn try_search_knn_closer_first(
        &self,
        query: &[Self::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<Vec<Neighbor>> {
        let mut heap = self.try_search_knn(query, k, filter)?;
        let mut remaining = heap.len();
        let mut out = vec![Neighbor::default(); remaining];
        while let Some(furthest) = heap.pop() {
            remaining -= 1;
            out[remaining] = furthest;
        }
        Ok(out)
    }

    /// Panicking form of [`try_search_knn_closer_first`](Self::try_search_knn_closer_first).
    ///
    /// # Panics
    ///
    /// Panics with the error message if the search fails.
    fn search_knn_closer_first(
        &self,
        query: &[Self::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Vec<Neighbor> {
        self.try_search_knn_closer_first(query, k, filter)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Persist the index to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written. The
    /// in-memory index is left untouched.
    fn try_save_index(&self, path: &Path) -> Result<()>;

    /// Panicking form of [`try_save_index`](Self::try_save_index).
    ///
    /// # Panics
    ///
    /// Panics with the error message if saving fails.
    fn save_index(&self, path: &Path) {
        if let Err(err) = self.try_save_index(path) {
            panic!("{err}");
        }
    }
}
