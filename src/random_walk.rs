//! Epsilon-terminated random walks.

use crate::graph::{Edge, NodeId};
use crate::rng::RandomSource;
use crate::store::NeighborLookup;
use crate::{Error, Result};

/// One recorded transition, in walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversedEdge {
    pub edge: Edge,
    pub step: u64,
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The termination draw fell below epsilon.
    Terminated,
    /// The current node has no out-neighbors.
    DeadEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkOutcome {
    /// Number of recorded transitions (self-loops excluded).
    pub steps: u64,
    /// Node the walk stopped on.
    pub terminal: NodeId,
    pub stop: StopReason,
}

/// Reject a termination probability outside `[0, 1]` (NaN included).
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "epsilon must be within [0, 1], got {epsilon}"
        )))
    }
}

/// Run one walk from `start`, streaming each recorded transition to `on_step`.
///
/// Every iteration first draws `alpha`; `alpha < epsilon` ends the walk on the current node.
/// Otherwise a neighbor is chosen uniformly. An empty neighbor list ends the walk as a dead
/// end. Picking the current node again (a self-loop) records nothing, keeps the step index, and
/// the loop draws again.
///
/// With `epsilon == 0` only dead ends stop a walk. On a cycle, or on a node whose only
/// neighbor is itself, the walk runs forever; there is no step cap.
///
/// Errors from the neighbor lookup or from `on_step` abort the walk.
pub fn sample_walk<L, R, F>(
    lookup: &L,
    start: NodeId,
    epsilon: f64,
    rng: &mut R,
    mut on_step: F,
) -> Result<WalkOutcome>
where
    L: NeighborLookup + ?Sized,
    R: RandomSource + ?Sized,
    F: FnMut(TraversedEdge) -> Result<()>,
{
    validate_epsilon(epsilon)?;

    let mut curr = start;
    let mut step = 0u64;
    loop {
        let alpha = rng.next_unit();
        if alpha < epsilon {
            return Ok(WalkOutcome { steps: step, terminal: curr, stop: StopReason::Terminated });
        }

        let neighbors = lookup.neighbors(curr)?;
        if neighbors.is_empty() {
            return Ok(WalkOutcome { steps: step, terminal: curr, stop: StopReason::DeadEnd });
        }
        let next = neighbors[rng.next_index(neighbors.len())];
        if next == curr {
            continue;
        }

        on_step(TraversedEdge { edge: Edge::new(curr, next), step })?;
        step += 1;
        curr = next;
    }
}

/// Collecting variant of [`sample_walk`].
pub fn walk_edges<L, R>(
    lookup: &L,
    start: NodeId,
    epsilon: f64,
    rng: &mut R,
) -> Result<(Vec<TraversedEdge>, WalkOutcome)>
where
    L: NeighborLookup + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut edges = Vec::new();
    let outcome = sample_walk(lookup, start, epsilon, rng, |t| {
        edges.push(t);
        Ok(())
    })?;
    Ok((edges, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyList;
    use crate::memory::MemoryStore;
    use crate::rng::SeededSource;

    fn store(edges: &[(NodeId, NodeId)]) -> MemoryStore {
        MemoryStore::new(AdjacencyList::from_edges(edges.iter().copied()))
    }

    #[test]
    fn epsilon_outside_unit_interval_is_rejected() {
        let s = store(&[(1, 2)]);
        let mut rng = SeededSource::new(1);
        for eps in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = walk_edges(&s, 1, eps, &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "eps={eps}");
        }
    }
}
