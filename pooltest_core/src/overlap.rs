//! Pairwise pool overlap of a design.
//!
//! Characterizes how well a design separates individuals: pairs sharing
//! many pools are the ones most likely to mask each other.

use crate::assignment::PoolAssignment;

/// For every unordered pair `(i, j)`, `i < j`, counts how many pools they
/// share. Bucket `k` holds the number of pairs sharing exactly `k` pools.
///
/// The table has `max_pools_per_individual + 1` buckets and sums to
/// `N * (N - 1) / 2`. A design with no individuals yields `[0]`.
pub fn overlap_counts(assignment: &PoolAssignment) -> Vec<u64> {
    let mut counts = vec![0u64; assignment.max_pools_per_individual() + 1];
    let sets = assignment.sets();
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            counts[a.intersection_len(b)] += 1;
        }
    }
    counts
}

/// Number of unordered pairs among `n` individuals.
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}
