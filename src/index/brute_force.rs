//! Brute force index for exact nearest neighbor search.
//!
//! Records live contiguously in a preallocated arena of fixed capacity. A
//! label map translates external labels to slots; removal moves the last
//! live record into the freed slot so live records always occupy
//! `[0, len)`, which is what the linear scan walks.
//!
//! # Concurrency
//!
//! One [`RwLock`] guards the label map, the live count, and the arena bytes.
//! Inserts and removals hold the write lock for both their bookkeeping and
//! their payload copy; searches and saves hold the read lock for the whole
//! scan. A reader therefore never sees a half-written record.

use crate::error::{KnnError, Result};
use crate::index::arena::Arena;
use crate::index::filter::LabelFilter;
use crate::index::stop_condition::SearchStopCondition;
use crate::index::traits::{FurthestFirst, KnnIndex, Neighbor};
use crate::metrics::{IndexStatistics, ResourceLimits, SearchStatistics, SearchStatsBuilder};
use crate::persistence::{self, IndexHeader};
use crate::space::Space;
use crate::types::{Label, Slot};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{BinaryHeap, HashMap};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

struct FlatState {
    arena: Arena,
    labels: HashMap<Label, Slot>,
    count: usize,
}

impl FlatState {
    fn records(&self) -> impl Iterator<Item = Slot> {
        (0..self.count).map(Slot)
    }
}

/// Counters gathered during one scan.
#[derive(Default)]
struct ScanCounters {
    pruned: usize,
    filtered: usize,
}

/// Exact nearest neighbor index over a fixed-capacity record arena.
///
/// Every query computes the distance to every live record, guaranteeing
/// exact results at O(n) search cost.
///
/// # Example
///
/// ```
/// use forge_knn::{BruteForceIndex, KnnIndex, L2Space, Label};
///
/// let index = BruteForceIndex::new(L2Space::new(2), 10).unwrap();
/// index.add_point(&[0.0, 0.0], Label(1), false);
/// index.add_point(&[5.0, 5.0], Label(2), false);
///
/// let hits = index.search_knn_closer_first(&[1.0, 1.0], 1, None);
/// assert_eq!(hits[0].label, Label(1));
/// ```
pub struct BruteForceIndex<S: Space> {
    space: S,
    state: RwLock<FlatState>,
    limits: ResourceLimits,
}

impl<S: Space> BruteForceIndex<S> {
    /// Create an empty index able to hold `capacity` points.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::AllocationFailed`] if the arena cannot be allocated.
    pub fn new(space: S, capacity: usize) -> Result<Self> {
        Self::with_limits(space, capacity, ResourceLimits::none())
    }

    /// Create an empty index, refusing arenas that exceed `limits`.
    ///
    /// # Errors
    ///
    /// Returns a limit error before allocating if `capacity` or the arena
    /// size exceeds `limits`, or [`KnnError::AllocationFailed`] if the
    /// allocation itself fails.
    pub fn with_limits(space: S, capacity: usize, limits: ResourceLimits) -> Result<Self> {
        let arena = Arena::allocate_within(&limits, capacity, space.data_size())?;
        info!(
            capacity,
            dim = space.dim(),
            stride = arena.stride(),
            "allocated brute force index"
        );

        Ok(Self {
            space,
            state: RwLock::new(FlatState {
                arena,
                labels: HashMap::with_capacity(capacity),
                count: 0,
            }),
            limits,
        })
    }

    /// Load an index saved with [`KnnIndex::try_save_index`].
    ///
    /// `space` must describe the same vectors the index was saved with.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is truncated, was saved
    /// with a different record size, or holds inconsistent records.
    pub fn load(path: impl AsRef<Path>, space: S) -> Result<Self> {
        Self::load_with_limits(path, space, ResourceLimits::none())
    }

    /// Load an index, refusing arenas that exceed `limits`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), plus limit errors.
    pub fn load_with_limits(path: impl AsRef<Path>, space: S, limits: ResourceLimits) -> Result<Self> {
        let path = path.as_ref();
        let mut file = persistence::open_index(path)?;
        let header = persistence::read_header(&mut file.reader)?;

        let stride = Arena::stride_for(space.data_size());
        if header.stride != stride {
            return Err(KnnError::invalid_format(format!(
                "record size mismatch: file has {} bytes per record, space needs {}",
                header.stride, stride
            )));
        }
        if header.count > header.capacity {
            return Err(KnnError::index_corrupted(format!(
                "count {} exceeds capacity {}",
                header.count, header.capacity
            )));
        }
        file.check_body_len(&header)?;

        let mut arena = Arena::allocate_within(&limits, header.capacity, space.data_size())?;
        persistence::read_arena(&mut file.reader, arena.as_bytes_mut())?;
        arena.clear_from(Slot(header.count));

        let mut labels = HashMap::with_capacity(header.count);
        for slot in (0..header.count).map(Slot) {
            let label = arena.label(slot);
            if labels.insert(label, slot).is_some() {
                return Err(KnnError::index_corrupted(format!(
                    "duplicate {} at slot {}",
                    label, slot.0
                )));
            }
        }

        info!(
            path = %path.display(),
            capacity = header.capacity,
            count = header.count,
            "loaded brute force index"
        );

        Ok(Self {
            space,
            state: RwLock::new(FlatState {
                arena,
                labels,
                count: header.count,
            }),
            limits,
        })
    }

    /// The distance space this index was built against.
    pub fn space(&self) -> &S {
        &self.space
    }

    /// Maximum number of points.
    pub fn capacity(&self) -> usize {
        self.state.read().arena.capacity()
    }

    /// Return true if `label` is present.
    pub fn contains(&self, label: Label) -> bool {
        self.state.read().labels.contains_key(&label)
    }

    /// Labels of all live points, in slot order.
    pub fn labels(&self) -> Vec<Label> {
        let state = self.state.read();
        state.records().map(|slot| state.arena.label(slot)).collect()
    }

    /// Copy of the vector stored under `label`.
    pub fn get_data_by_label(&self, label: Label) -> Option<Vec<S::Elem>> {
        let state = self.state.read();
        let slot = *state.labels.get(&label)?;
        Some(self.space.decode(state.arena.payload(slot)))
    }

    /// Remove the point stored under `label`.
    ///
    /// Returns false, and changes nothing, if the label is absent. The last
    /// live record moves into the freed slot; the vacated slot is zeroed.
    pub fn remove_point(&self, label: Label) -> bool {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let Some(freed) = state.labels.remove(&label) else {
            return false;
        };

        let last = Slot(state.count - 1);
        if freed != last {
            let moved = state.arena.label(last);
            state.labels.insert(moved, freed);
            state.arena.copy_record(last, freed);
        }
        state.arena.clear(last);
        state.count -= 1;
        true
    }

    /// Change the capacity of the index.
    ///
    /// Capacity never changes implicitly; this is the only way to grow or
    /// shrink the arena. Live records keep their slots.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidParameter`] if `new_capacity` is below the
    /// number of live points, or a limit/allocation error. On error the
    /// index is unchanged.
    pub fn try_resize(&self, new_capacity: usize) -> Result<()> {
        let mut state = self.state.write();
        if new_capacity < state.count {
            return Err(KnnError::invalid_parameter(format!(
                "cannot resize to {} below the {} live points",
                new_capacity, state.count
            )));
        }

        let old_capacity = state.arena.capacity();
        state.arena = state.arena.reallocate(&self.limits, new_capacity, state.count)?;
        info!(old_capacity, new_capacity, "resized brute force index");
        Ok(())
    }

    /// Panicking form of [`try_resize`](Self::try_resize).
    ///
    /// # Panics
    ///
    /// Panics with the error message if resizing fails.
    pub fn resize(&self, new_capacity: usize) {
        if let Err(err) = self.try_resize(new_capacity) {
            panic!("{err}");
        }
    }

    /// Snapshot of the index's size and memory use.
    pub fn statistics(&self) -> IndexStatistics {
        let state = self.state.read();
        let capacity = state.arena.capacity();
        IndexStatistics {
            num_vectors: state.count,
            capacity,
            dimension: self.space.dim(),
            record_size: state.arena.stride(),
            memory_bytes: state.arena.as_bytes().len(),
            fill_ratio: if capacity == 0 {
                0.0
            } else {
                state.count as f32 / capacity as f32
            },
        }
    }

    /// Same result as [`KnnIndex::try_search_knn`], plus scan statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the query dimension does not match.
    pub fn search_with_stats(
        &self,
        query: &[S::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<(FurthestFirst, SearchStatistics)> {
        let start = Instant::now();
        let query = self.space.encode(query)?;

        let state = self.state.read();
        let mut counters = ScanCounters::default();
        let top = self.scan(&state, &query, k, filter, &mut counters);

        let mut stats = SearchStatsBuilder::new();
        let scanned = if k == 0 { 0 } else { state.count };
        stats.add_vectors_scanned(scanned);
        stats.add_distances(scanned);
        stats.add_pruned(counters.pruned);
        stats.add_filtered(counters.filtered);
        stats.set_query_time(start.elapsed());

        Ok((top, stats.build()))
    }

    /// Search driven by a caller-supplied stop condition.
    ///
    /// Every live record is visited. The condition decides which candidates
    /// enter the running result and when it holds too many; its
    /// `filter_results` hook trims the final, closest-first list.
    /// [`SearchStopCondition::should_stop_search`] is not consulted because a
    /// scan in slot order has no distance frontier to stop at.
    ///
    /// # Errors
    ///
    /// Returns an error if the query dimension does not match.
    pub fn search_with_stop_condition(
        &self,
        query: &[S::Elem],
        stop: &mut dyn SearchStopCondition,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<Vec<Neighbor>> {
        let query = self.space.encode(query)?;
        let state = self.state.read();

        let mut top: BinaryHeap<Neighbor> = BinaryHeap::new();
        for slot in state.records() {
            let payload = state.arena.payload(slot);
            let dist = self.space.distance(&query, payload);
            let lower_bound = top.peek().map_or(f32::INFINITY, |n| n.distance);
            if !stop.should_consider_candidate(dist, lower_bound) {
                continue;
            }

            let label = state.arena.label(slot);
            if filter.is_some_and(|f| !f.allows(label)) {
                continue;
            }

            top.push(Neighbor::new(dist, label));
            stop.add_point_to_result(label, payload, dist);

            while stop.should_remove_extra() {
                let Some(evicted) = top.pop() else {
                    break;
                };
                let evicted_payload = state
                    .labels
                    .get(&evicted.label)
                    .map_or(&[][..], |&s| state.arena.payload(s));
                stop.remove_point_from_result(evicted.label, evicted_payload, evicted.distance);
            }
        }

        let mut candidates: Vec<(f32, Label)> = top
            .into_sorted_vec()
            .into_iter()
            .map(|n| (n.distance, n.label))
            .collect();
        stop.filter_results(&mut candidates);

        Ok(candidates
            .into_iter()
            .map(|(distance, label)| Neighbor::new(distance, label))
            .collect())
    }

    /// Batch search for multiple queries in parallel.
    ///
    /// Processes all queries concurrently using Rayon, returning closest-first
    /// results for each query in the same order as the input.
    ///
    /// # Errors
    ///
    /// Returns the first error any query produced.
    pub fn batch_search(
        &self,
        queries: &[Vec<S::Elem>],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<Vec<Vec<Neighbor>>> {
        queries
            .par_iter()
            .with_min_len(crate::constants::search::BATCH_MIN_QUERIES_PER_TASK)
            .map(|query| self.try_search_knn_closer_first(query, k, filter))
            .collect()
    }

    /// Bounded top-k over the live records.
    ///
    /// A candidate further than the current k-th best is skipped before its
    /// label is read or the filter consulted, once the heap is full.
    fn scan(
        &self,
        state: &FlatState,
        query: &[u8],
        k: usize,
        filter: Option<&dyn LabelFilter>,
        counters: &mut ScanCounters,
    ) -> FurthestFirst {
        let mut top = BinaryHeap::with_capacity(k.saturating_add(1).min(state.count + 1));
        if k == 0 {
            return top;
        }

        let mut last_dist = f32::INFINITY;
        for slot in state.records() {
            let dist = self.space.distance(query, state.arena.payload(slot));
            if dist > last_dist && top.len() == k {
                counters.pruned += 1;
                continue;
            }

            let label = state.arena.label(slot);
            if filter.is_some_and(|f| !f.allows(label)) {
                counters.filtered += 1;
                continue;
            }

            top.push(Neighbor::new(dist, label));
            if top.len() > k {
                top.pop();
            }
            if let Some(furthest) = top.peek() {
                last_dist = furthest.distance;
            }
        }
        top
    }
}

impl<S: Space> KnnIndex for BruteForceIndex<S> {
    type Elem = S::Elem;

    fn dim(&self) -> usize {
        self.space.dim()
    }

    fn len(&self) -> usize {
        self.state.read().count
    }

    fn try_add_point(&self, vector: &[S::Elem], label: Label, _replace_deleted: bool) -> Result<()> {
        let payload = self.space.encode(vector)?;

        let mut guard = self.state.write();
        let state = &mut *guard;

        if let Some(&slot) = state.labels.get(&label) {
            state.arena.write_payload(slot, &payload);
            return Ok(());
        }

        let capacity = state.arena.capacity();
        if state.count == capacity {
            warn!(%label, capacity, "insert rejected: index is full");
            return Err(KnnError::capacity_exceeded(capacity));
        }

        let slot = Slot(state.count);
        state.labels.insert(label, slot);
        state.count += 1;
        state.arena.write(slot, &payload, label);
        Ok(())
    }

    fn try_search_knn(
        &self,
        query: &[S::Elem],
        k: usize,
        filter: Option<&dyn LabelFilter>,
    ) -> Result<FurthestFirst> {
        let query = self.space.encode(query)?;
        let state = self.state.read();
        Ok(self.scan(&state, &query, k, filter, &mut ScanCounters::default()))
    }

    fn try_save_index(&self, path: &Path) -> Result<()> {
        let state = self.state.read();
        let header = IndexHeader::new(state.arena.capacity(), state.arena.stride(), state.count);
        persistence::write_index(path, &header, state.arena.as_bytes())?;
        debug!(
            path = %path.display(),
            capacity = header.capacity,
            count = header.count,
            "saved brute force index"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::stop_condition::EpsilonSearchStopCondition;
    use crate::space::{InnerProductSpace, L2Space, L2SpaceI};

    fn create_test_index(capacity: usize) -> BruteForceIndex<L2Space> {
        BruteForceIndex::new(L2Space::new(3), capacity).unwrap()
    }

    fn closest_labels(index: &BruteForceIndex<L2Space>, query: &[f32], k: usize) -> Vec<u64> {
        index
            .search_knn_closer_first(query, k, None)
            .iter()
            .map(|n| n.label.0)
            .collect()
    }

    #[test]
    fn test_insert_and_get() {
        let index = create_test_index(10);

        index.add_point(&[1.0, 2.0, 3.0], Label(1), false);
        index.add_point(&[4.0, 5.0, 6.0], Label(2), false);

        assert_eq!(index.len(), 2);
        assert!(index.contains(Label(1)));
        assert!(!index.contains(Label(3)));
        assert_eq!(index.get_data_by_label(Label(2)), Some(vec![4.0, 5.0, 6.0]));
        assert_eq!(index.get_data_by_label(Label(3)), None);
        assert_eq!(index.labels(), vec![Label(1), Label(2)]);
    }

    #[test]
    fn test_upsert_keeps_slot_and_count() {
        let index = create_test_index(10);
        index.add_point(&[1.0, 0.0, 0.0], Label(7), false);
        index.add_point(&[2.0, 0.0, 0.0], Label(8), false);

        index.add_point(&[9.0, 9.0, 9.0], Label(7), false);

        assert_eq!(index.len(), 2);
        assert_eq!(index.labels(), vec![Label(7), Label(8)]);
        assert_eq!(index.get_data_by_label(Label(7)), Some(vec![9.0, 9.0, 9.0]));
    }

    #[test]
    fn test_capacity_exceeded() {
        let index = create_test_index(2);
        assert!(index.try_add_point(&[1.0, 0.0, 0.0], Label(10), false).is_ok());
        assert!(index.try_add_point(&[2.0, 0.0, 0.0], Label(11), false).is_ok());
        assert_eq!(index.len(), 2);

        let result = index.try_add_point(&[3.0, 0.0, 0.0], Label(12), false);
        assert!(matches!(result, Err(KnnError::CapacityExceeded { capacity: 2 })));
        assert_eq!(index.len(), 2);
        assert!(!index.contains(Label(12)));
        assert_eq!(index.get_data_by_label(Label(11)), Some(vec![2.0, 0.0, 0.0]));

        // Upserting an existing label still works when full.
        assert!(index.try_add_point(&[5.0, 0.0, 0.0], Label(10), false).is_ok());
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_add_point_panics_when_full() {
        let index = create_test_index(1);
        index.add_point(&[1.0, 0.0, 0.0], Label(1), false);
        index.add_point(&[2.0, 0.0, 0.0], Label(2), false);
    }

    #[test]
    fn test_remove_moves_last_record() {
        let index = create_test_index(10);
        for i in 0..4u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        assert!(index.remove_point(Label(1)));

        assert_eq!(index.len(), 3);
        assert_eq!(index.labels(), vec![Label(0), Label(3), Label(2)]);
        assert_eq!(index.get_data_by_label(Label(3)), Some(vec![3.0, 0.0, 0.0]));
        assert_eq!(closest_labels(&index, &[3.0, 0.0, 0.0], 1), vec![3]);
    }

    #[test]
    fn test_remove_last_record() {
        let index = create_test_index(10);
        index.add_point(&[0.0, 0.0, 0.0], Label(0), false);
        index.add_point(&[1.0, 0.0, 0.0], Label(1), false);

        assert!(index.remove_point(Label(1)));

        assert_eq!(index.len(), 1);
        assert!(!index.contains(Label(1)));
        assert_eq!(index.labels(), vec![Label(0)]);
        assert_eq!(closest_labels(&index, &[1.0, 0.0, 0.0], 5), vec![0]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let index = create_test_index(10);
        index.add_point(&[0.0, 0.0, 0.0], Label(0), false);

        assert!(!index.remove_point(Label(42)));
        assert_eq!(index.len(), 1);

        assert!(index.remove_point(Label(0)));
        assert!(!index.remove_point(Label(0)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_removed_slot_is_zeroed() {
        let index = create_test_index(2);
        index.add_point(&[1.0, 1.0, 1.0], Label(5), false);
        index.remove_point(Label(5));

        let state = index.state.read();
        assert!(state.arena.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_label_reuse_after_removal() {
        let index = create_test_index(2);
        index.add_point(&[1.0, 0.0, 0.0], Label(1), false);
        index.add_point(&[2.0, 0.0, 0.0], Label(2), false);
        index.remove_point(Label(1));

        index.add_point(&[7.0, 0.0, 0.0], Label(1), false);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get_data_by_label(Label(1)), Some(vec![7.0, 0.0, 0.0]));
    }

    #[test]
    fn test_search_furthest_first() {
        let index = create_test_index(10);
        for i in 0..10u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let mut heap = index.search_knn(&[0.0, 0.0, 0.0], 3, None);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop().unwrap().label, Label(2));
        assert_eq!(heap.pop().unwrap().label, Label(1));
        let nearest = heap.pop().unwrap();
        assert_eq!(nearest.label, Label(0));
        assert_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn test_search_with_filter() {
        let index = create_test_index(10);
        for i in 0..10u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let odd = |label: Label| label.0 % 2 == 1;
        let hits = index.search_knn_closer_first(&[0.0, 0.0, 0.0], 3, Some(&odd));
        let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
        assert_eq!(labels, vec![1, 3, 5]);
    }

    #[test]
    fn test_k_at_and_beyond_len() {
        let index = create_test_index(10);
        for i in 0..4u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        assert_eq!(closest_labels(&index, &[0.0, 0.0, 0.0], 4), vec![0, 1, 2, 3]);
        assert_eq!(closest_labels(&index, &[0.0, 0.0, 0.0], 5), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_zero_and_empty_index() {
        let index = create_test_index(10);
        assert!(index.search_knn(&[0.0, 0.0, 0.0], 3, None).is_empty());

        index.add_point(&[1.0, 2.0, 3.0], Label(1), false);
        assert!(index.search_knn(&[1.0, 2.0, 3.0], 0, None).is_empty());
    }

    #[test]
    fn test_ties_prefer_smaller_labels() {
        let index = create_test_index(10);
        for label in [9u64, 4, 6, 1] {
            index.add_point(&[1.0, 0.0, 0.0], Label(label), false);
        }

        assert_eq!(closest_labels(&index, &[0.0, 0.0, 0.0], 2), vec![1, 4]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = create_test_index(10);

        let result = index.try_add_point(&[1.0, 2.0], Label(1), false);
        assert!(matches!(result, Err(KnnError::DimensionMismatch { .. })));
        assert!(index.is_empty());

        let result = index.try_search_knn(&[1.0, 2.0], 1, None);
        assert!(matches!(result, Err(KnnError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_search_with_stats_counts_pruning() {
        let index = create_test_index(100);
        for i in 0..100u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let odd = |label: Label| label.0 % 2 == 1;
        let (top, stats) = index.search_with_stats(&[0.0, 0.0, 0.0], 5, Some(&odd)).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(stats.vectors_scanned, 100);
        assert_eq!(stats.distances_computed, 100);
        // Records 0..=9 reach the filter; everything from 10 on is pruned.
        assert_eq!(stats.vectors_filtered, 5);
        assert_eq!(stats.candidates_pruned, 90);
    }

    #[test]
    fn test_stop_condition_range_search() {
        let index = create_test_index(20);
        for i in 0..20u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        // Squared distances 0, 1, 4, 9 fall within epsilon 9.5.
        let mut stop = EpsilonSearchStopCondition::new(9.5, 1, 10);
        let hits = index
            .search_with_stop_condition(&[0.0, 0.0, 0.0], &mut stop, None)
            .unwrap();
        let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert_eq!(stop.current_len(), 10);
    }

    #[test]
    fn test_stop_condition_respects_max_candidates() {
        let index = create_test_index(20);
        for i in (0..20u64).rev() {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let mut stop = EpsilonSearchStopCondition::new(1000.0, 1, 3);
        let hits = index
            .search_with_stop_condition(&[0.0, 0.0, 0.0], &mut stop, None)
            .unwrap();
        let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    /// Keeps up to five results until it has seen five, then only two.
    struct ShrinkingWindow {
        max: usize,
        current: usize,
        seen: usize,
    }

    impl SearchStopCondition for ShrinkingWindow {
        fn add_point_to_result(&mut self, _label: Label, _data: &[u8], _distance: f32) {
            self.current += 1;
            self.seen += 1;
            if self.seen == 5 {
                self.max = 2;
            }
        }

        fn remove_point_from_result(&mut self, _label: Label, _data: &[u8], _distance: f32) {
            self.current -= 1;
        }

        fn should_stop_search(&mut self, _candidate_distance: f32, _lower_bound: f32) -> bool {
            false
        }

        fn should_consider_candidate(&mut self, _candidate_distance: f32, _lower_bound: f32) -> bool {
            true
        }

        fn should_remove_extra(&mut self) -> bool {
            self.current > self.max
        }

        fn filter_results(&mut self, _candidates: &mut Vec<(f32, Label)>) {}
    }

    #[test]
    fn test_stop_condition_trims_every_extra_entry() {
        let index = create_test_index(10);
        for i in 0..10u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let mut stop = ShrinkingWindow {
            max: 5,
            current: 0,
            seen: 0,
        };
        let hits = index
            .search_with_stop_condition(&[0.0, 0.0, 0.0], &mut stop, None)
            .unwrap();
        let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
        assert_eq!(labels, vec![0, 1]);
        assert_eq!(stop.current, 2);
    }

    #[test]
    fn test_resize() {
        let index = create_test_index(2);
        index.add_point(&[1.0, 0.0, 0.0], Label(1), false);
        index.add_point(&[2.0, 0.0, 0.0], Label(2), false);
        assert!(index.try_add_point(&[3.0, 0.0, 0.0], Label(3), false).is_err());

        index.resize(4);
        assert_eq!(index.capacity(), 4);
        index.add_point(&[3.0, 0.0, 0.0], Label(3), false);
        assert_eq!(closest_labels(&index, &[2.0, 0.0, 0.0], 1), vec![2]);

        let result = index.try_resize(2);
        assert!(matches!(result, Err(KnnError::InvalidParameter(_))));
        assert_eq!(index.capacity(), 4);

        index.resize(3);
        assert_eq!(index.capacity(), 3);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_resize_respects_limits() {
        let limits = ResourceLimits::none().with_max_vectors(4);
        let index = BruteForceIndex::with_limits(L2Space::new(3), 2, limits).unwrap();
        let result = index.try_resize(8);
        assert!(matches!(result, Err(KnnError::VectorLimitExceeded { .. })));
        assert_eq!(index.capacity(), 2);
    }

    #[test]
    fn test_construction_limits() {
        let limits = ResourceLimits::none().with_max_memory_bytes(100);
        // 10 records of 3 * 4 + 8 bytes = 200 bytes.
        let result = BruteForceIndex::with_limits(L2Space::new(3), 10, limits);
        assert!(matches!(result, Err(KnnError::MemoryLimitExceeded { .. })));
    }

    #[test]
    fn test_allocation_overflow() {
        let result = BruteForceIndex::new(L2Space::new(3), usize::MAX);
        assert!(matches!(result, Err(KnnError::AllocationFailed { .. })));
    }

    #[test]
    fn test_statistics() {
        let index = create_test_index(8);
        index.add_point(&[0.0, 0.0, 0.0], Label(0), false);
        index.add_point(&[1.0, 0.0, 0.0], Label(1), false);

        let stats = index.statistics();
        assert_eq!(stats.num_vectors, 2);
        assert_eq!(stats.capacity, 8);
        assert_eq!(stats.dimension, 3);
        assert_eq!(stats.record_size, 20);
        assert_eq!(stats.memory_bytes, 160);
        assert!((stats.fill_ratio - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_batch_search() {
        let index = create_test_index(50);
        for i in 0..50u64 {
            index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
        }

        let queries: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32 * 2.0, 0.0, 0.0]).collect();
        let results = index.batch_search(&queries, 1, None).unwrap();

        assert_eq!(results.len(), 20);
        for (i, hits) in results.iter().enumerate() {
            assert_eq!(hits[0].label, Label(i as u64 * 2));
        }

        let bad = vec![vec![0.0, 0.0]];
        assert!(index.batch_search(&bad, 1, None).is_err());
    }

    #[test]
    fn test_inner_product_space() {
        let index = BruteForceIndex::new(InnerProductSpace::new(3), 3).unwrap();
        index.add_point(&[1.0, 1.0, 1.0], Label(1), false);
        index.add_point(&[0.1, 0.1, 0.1], Label(2), false);
        index.add_point(&[-1.0, -1.0, -1.0], Label(3), false);

        let hits = index.search_knn_closer_first(&[1.0, 1.0, 1.0], 3, None);
        let labels: Vec<u64> = hits.iter().map(|n| n.label.0).collect();
        assert_eq!(labels, vec![1, 2, 3]);
        assert!((hits[0].distance - (-2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_byte_vectors() {
        let index = BruteForceIndex::new(L2SpaceI::new(4), 3).unwrap();
        index.add_point(&[0, 0, 0, 0], Label(1), false);
        index.add_point(&[255, 255, 255, 255], Label(2), false);

        let hits = index.search_knn_closer_first(&[250, 250, 250, 250], 2, None);
        assert_eq!(hits[0].label, Label(2));
        assert_eq!(hits[0].distance, 100.0);
        assert_eq!(index.get_data_by_label(Label(2)), Some(vec![255; 4]));
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let index = Arc::new(create_test_index(16));

        let mut handles = vec![];

        // Spawn writers
        for i in 0..10u64 {
            let index = Arc::clone(&index);
            handles.push(thread::spawn(move || {
                index.add_point(&[i as f32, 0.0, 0.0], Label(i), false);
            }));
        }

        // Spawn readers
        for _ in 0..10 {
            let index = Arc::clone(&index);
            handles.push(thread::spawn(move || {
                let _ = index.try_search_knn(&[0.0, 0.0, 0.0], 5, None);
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.len(), 10);
    }
}
