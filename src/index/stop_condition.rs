//! Caller-controlled result maintenance for custom searches.
//!
//! A [`SearchStopCondition`] takes over the decisions a plain top-k search
//! makes on its own: whether a candidate is admitted, when the running result
//! holds too many entries, when traversal may stop, and which of the final
//! candidates survive.

use crate::types::Label;

/// Hooks invoked while an index maintains a running result set.
///
/// `lower_bound` is the distance of the furthest entry currently in the
/// result, or `f32::INFINITY` while the result is empty.
pub trait SearchStopCondition {
    /// A candidate was added to the running result.
    fn add_point_to_result(&mut self, label: Label, data: &[u8], distance: f32);

    /// A candidate was evicted from the running result.
    fn remove_point_from_result(&mut self, label: Label, data: &[u8], distance: f32);

    /// Return true if traversal can stop before examining `candidate_distance`.
    ///
    /// Only indexes that visit candidates in increasing distance order can
    /// act on this; a linear scan visits every record regardless.
    fn should_stop_search(&mut self, candidate_distance: f32, lower_bound: f32) -> bool;

    /// Return true if a candidate at `candidate_distance` should be admitted.
    fn should_consider_candidate(&mut self, candidate_distance: f32, lower_bound: f32) -> bool;

    /// Return true if the running result holds more entries than wanted.
    fn should_remove_extra(&mut self) -> bool;

    /// Trim the final candidates, given closest first.
    fn filter_results(&mut self, candidates: &mut Vec<(f32, Label)>);
}

/// Range search: everything within `epsilon`, bounded by a candidate window.
///
/// At least `min_candidates` results are examined before the epsilon bound
/// ends traversal, and at most `max_candidates` are kept. Results beyond
/// `epsilon` are dropped at the end.
#[derive(Debug, Clone)]
pub struct EpsilonSearchStopCondition {
    epsilon: f32,
    min_candidates: usize,
    max_candidates: usize,
    current: usize,
}

impl EpsilonSearchStopCondition {
    /// Create a condition for radius `epsilon`.
    ///
    /// `min_candidates` is clamped to at most `max_candidates`.
    pub fn new(epsilon: f32, min_candidates: usize, max_candidates: usize) -> Self {
        Self {
            epsilon,
            min_candidates: min_candidates.min(max_candidates),
            max_candidates,
            current: 0,
        }
    }

    /// Search radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Number of entries currently in the running result.
    pub fn current_len(&self) -> usize {
        self.current
    }
}

impl SearchStopCondition for EpsilonSearchStopCondition {
    fn add_point_to_result(&mut self, _label: Label, _data: &[u8], _distance: f32) {
        self.current += 1;
    }

    fn remove_point_from_result(&mut self, _label: Label, _data: &[u8], _distance: f32) {
        self.current = self.current.saturating_sub(1);
    }

    fn should_stop_search(&mut self, candidate_distance: f32, lower_bound: f32) -> bool {
        // Result is full and the candidate cannot improve it.
        if candidate_distance > lower_bound && self.current == self.max_candidates {
            return true;
        }
        candidate_distance > self.epsilon && self.current >= self.min_candidates
    }

    fn should_consider_candidate(&mut self, candidate_distance: f32, lower_bound: f32) -> bool {
        self.current < self.max_candidates || lower_bound > candidate_distance
    }

    fn should_remove_extra(&mut self) -> bool {
        self.current > self.max_candidates
    }

    fn filter_results(&mut self, candidates: &mut Vec<(f32, Label)>) {
        while candidates
            .last()
            .is_some_and(|&(distance, _)| distance > self.epsilon)
        {
            candidates.pop();
        }
    }
}
