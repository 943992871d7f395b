//! Rank aggregation: landing counts to relative scores.

use crate::graph::NodeId;
use crate::store::WalkStore;
use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Per-node landing counts, or the scores derived from them.
pub type RankMap = HashMap<NodeId, f64>;

/// Divide every count by the total over all listed nodes.
///
/// Only nodes that received walk traffic contribute to the denominator, so visited nodes come
/// out larger than under a full-graph normalization. That is intended: no walk count, node
/// count or epsilon is needed, and only the relative order matters.
///
/// A zero total returns the input unchanged.
pub fn normalize_counts(mut counts: RankMap) -> RankMap {
    let sum: f64 = counts.values().sum();
    if sum == 0.0 {
        return counts;
    }
    for v in counts.values_mut() {
        *v /= sum;
    }
    counts
}

/// Landing counts for `category`, normalized with [`normalize_counts`].
pub fn compute_ranks<S: WalkStore + ?Sized>(store: &S, category: &str) -> crate::Result<RankMap> {
    Ok(normalize_counts(store.walk_counts(category)?))
}

/// The `k` highest-scoring nodes, best first.
///
/// Non-finite and non-positive scores are skipped. Equal scores order by ascending node id.
pub fn top_k(scores: &RankMap, k: usize) -> Vec<(NodeId, f64)> {
    if k == 0 || scores.is_empty() {
        return Vec::new();
    }
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (&node, &score) in scores {
        if !score.is_finite() || score <= 0.0 {
            continue;
        }
        let Ok(s) = NotNan::new(score) else { continue };
        let key = Reverse((s, Reverse(node)));
        if heap.len() < k {
            heap.push(key);
        } else if let Some(min) = heap.peek() {
            if key < *min {
                heap.pop();
                heap.push(key);
            }
        }
    }
    let mut results: Vec<(NodeId, f64)> = heap
        .into_iter()
        .map(|Reverse((s, Reverse(node)))| (node, s.into_inner()))
        .collect();
    results.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    results
}
