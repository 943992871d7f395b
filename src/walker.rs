//! One worker's walk pipeline: transaction, walk id, sampling, recording, commit.

use crate::graph::{NodeId, WalkId};
use crate::random_walk::{sample_walk, validate_epsilon, WalkOutcome};
use crate::rank::{compute_ranks, RankMap};
use crate::rng::{RandomSource, SeededSource};
use crate::segment::SegmentRecorder;
use crate::store::{WalkStore, WalkTransaction};
use crate::Result;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub walk_id: WalkId,
    pub start: NodeId,
    pub outcome: WalkOutcome,
}

/// Runs walks against a store with an exclusively owned generator.
///
/// A `Walker` is not meant to be shared between threads; give every worker its own.
pub struct Walker<'s, S: ?Sized, R = SeededSource> {
    store: &'s S,
    rng: R,
}

impl<'s, S: WalkStore + ?Sized> Walker<'s, S> {
    pub fn seeded(store: &'s S, seed: u64) -> Self {
        Self::new(store, SeededSource::new(seed))
    }
}

impl<'s, S, R> Walker<'s, S, R>
where
    S: WalkStore + ?Sized,
    R: RandomSource,
{
    pub fn new(store: &'s S, rng: R) -> Self {
        Self { store, rng }
    }

    /// One walk in its own transaction.
    ///
    /// On any failure the transaction is dropped uncommitted, so none of this walk's segments
    /// become visible.
    pub fn walk(&mut self, start: NodeId, epsilon: f64, category: &str) -> Result<WalkSummary> {
        validate_epsilon(epsilon)?;
        let store = self.store;
        let mut tx = store.begin()?;
        let summary = self.walk_in(&mut tx, start, epsilon, category)?;
        tx.commit()?;
        Ok(summary)
    }

    /// One walk inside a transaction owned by the caller.
    ///
    /// Epsilon is checked by the sampler once the walk id is drawn.
    pub fn walk_in<T>(
        &mut self,
        tx: &mut T,
        start: NodeId,
        epsilon: f64,
        category: &str,
    ) -> Result<WalkSummary>
    where
        T: WalkTransaction + ?Sized,
    {
        let began = Instant::now();
        let walk_id = self.store.generate_walk_id()?;
        let mut recorder = SegmentRecorder::new(tx, walk_id, category);
        let outcome = sample_walk(self.store, start, epsilon, &mut self.rng, |t| {
            recorder.record(t).map(|_| ())
        })?;
        let elapsed_ms = began.elapsed().as_millis() as u64;
        let steps = outcome.steps;
        tracing::info!(
            start,
            walk_id,
            elapsed_ms,
            steps,
            "walk {start} elapsed: {elapsed_ms} {steps} steps"
        );

        Ok(WalkSummary { walk_id, start, outcome })
    }

    pub fn compute_ranks(&self, category: &str) -> Result<RankMap> {
        compute_ranks(self.store, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyList, Edge};
    use crate::memory::MemoryStore;

    #[test]
    fn committed_walk_is_visible_with_dense_steps() {
        let store = MemoryStore::new(AdjacencyList::from_edges([(1, 2), (2, 3), (3, 1)]));
        let mut walker = Walker::seeded(&store, 5);
        let summary = walker.walk(1, 0.2, "global").unwrap();

        let segments = store.segments_for_walk(summary.walk_id);
        assert_eq!(segments.len() as u64, summary.outcome.steps);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.step, i as u64);
            assert_eq!(s.category, "global");
        }
        if let Some(last) = segments.last() {
            assert_eq!(last.edge.destination, summary.outcome.terminal);
        }
        if let Some(first) = segments.first() {
            assert_eq!(first.edge, Edge::new(1, 2));
        }
    }

    #[test]
    fn each_walk_gets_a_fresh_id() {
        let store = MemoryStore::new(AdjacencyList::from_edges([(1, 2)]));
        let mut walker = Walker::seeded(&store, 1);
        let a = walker.walk(1, 0.5, "global").unwrap();
        let b = walker.walk(1, 0.5, "global").unwrap();
        assert_ne!(a.walk_id, b.walk_id);
    }

    #[test]
    fn ranks_reflect_committed_walks() {
        let store = MemoryStore::new(AdjacencyList::from_edges([(1, 2)]));
        let mut walker = Walker::seeded(&store, 4);
        assert!(walker.compute_ranks("global").unwrap().is_empty());

        walker.walk(1, 0.0, "global").unwrap();
        let ranks = walker.compute_ranks("global").unwrap();
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[&2], 1.0);
    }

    #[test]
    fn walk_in_rejects_bad_epsilon_inside_the_sampler() {
        let store = MemoryStore::new(AdjacencyList::from_edges([(1, 2)]));
        let mut walker = Walker::seeded(&store, 1);
        let mut tx = store.begin().unwrap();
        let err = walker.walk_in(&mut tx, 1, -0.1, "global").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidParameter(_)));
        tx.commit().unwrap();
        assert_eq!(store.segment_count(), 0);
    }

    #[test]
    fn invalid_epsilon_writes_nothing() {
        let store = MemoryStore::new(AdjacencyList::from_edges([(1, 2)]));
        let mut walker = Walker::seeded(&store, 1);
        assert!(walker.walk(1, 2.0, "global").is_err());
        assert_eq!(store.segment_count(), 0);
    }
}
