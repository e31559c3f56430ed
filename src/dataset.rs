//! Synthetic datasets and ground truth for evaluating search.
//!
//! Ground truth here is computed by sorting every distance, independently of
//! any index, so it can be used to check an index's exactness.

use crate::space::scalar::l2_squared;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// A dataset containing vectors, queries, and ground truth for evaluation.
///
/// Vector `i` is meant to be stored under label `i`.
pub struct Dataset {
    pub vectors: Vec<Vec<f32>>,
    pub queries: Vec<Vec<f32>>,
    pub ground_truth: Vec<Vec<u64>>,
}

impl Dataset {
    /// Generate a random synthetic dataset with values in [-1.0, 1.0).
    ///
    /// The same `seed` always yields the same dataset.
    pub fn generate(n_vectors: usize, n_queries: usize, dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let random_vector = |rng: &mut StdRng| -> Vec<f32> {
            (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
        };

        let vectors = (0..n_vectors).map(|_| random_vector(&mut rng)).collect();
        let queries = (0..n_queries).map(|_| random_vector(&mut rng)).collect();

        Self {
            vectors,
            queries,
            ground_truth: Vec::new(),
        }
    }

    /// Compute squared-Euclidean ground truth for every query.
    ///
    /// For each query, stores the labels of the `k` nearest vectors, nearest
    /// first, breaking distance ties towards the smaller label.
    pub fn compute_ground_truth(&mut self, k: usize) {
        self.ground_truth = self
            .queries
            .iter()
            .map(|query| exact_neighbors(&self.vectors, query, k))
            .collect();
    }
}

/// Labels of the `k` vectors nearest to `query` under squared Euclidean distance.
pub fn exact_neighbors(vectors: &[Vec<f32>], query: &[f32], k: usize) -> Vec<u64> {
    let mut scored: Vec<(f32, u64)> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| (l2_squared(query, v), i as u64))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.into_iter().take(k).map(|(_, label)| label).collect()
}

/// Compute recall@k between predicted and ground truth results.
///
/// Recall is the fraction of true nearest neighbors that were found.
/// Returns a value between 0.0 and 1.0.
pub fn recall_at_k(predicted: &[u64], ground_truth: &[u64], k: usize) -> f32 {
    if k == 0 {
        return 1.0;
    }
    let pred_set: HashSet<u64> = predicted.iter().take(k).copied().collect();
    let truth_set: HashSet<u64> = ground_truth.iter().take(k).copied().collect();

    let intersection = pred_set.intersection(&truth_set).count();
    intersection as f32 / k as f32
}
