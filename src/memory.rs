//! In-process storage backend.
//!
//! Topology is any [`Graph`] and is never mutated once the store exists. Committed segments
//! live in one append-only log behind a read-write lock; walk ids come from an atomic counter.

use crate::graph::{AdjacencyList, Graph, NodeId, WalkId, WalkSegment};
use crate::rank::RankMap;
use crate::store::{NeighborLookup, StoreError, WalkStore, WalkTransaction};
use parking_lot::{Mutex, RwLock};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct MemoryStore<G = AdjacencyList> {
    graph: G,
    segments: RwLock<Vec<WalkSegment>>,
    next_walk_id: AtomicU64,
    sampler: Mutex<ChaCha8Rng>,
}

impl<G: Graph> MemoryStore<G> {
    pub fn new(graph: G) -> Self {
        Self::with_seed(graph, 0)
    }

    /// `seed` drives [`WalkStore::random_node_ids`] only.
    pub fn with_seed(graph: G, seed: u64) -> Self {
        Self {
            graph,
            segments: RwLock::new(Vec::new()),
            next_walk_id: AtomicU64::new(1),
            sampler: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Snapshot of every committed segment, in commit order.
    pub fn segments(&self) -> Vec<WalkSegment> {
        self.segments.read().clone()
    }

    pub fn segments_for_walk(&self, walk_id: WalkId) -> Vec<WalkSegment> {
        self.segments
            .read()
            .iter()
            .filter(|s| s.walk_id == walk_id)
            .cloned()
            .collect()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.read().len()
    }
}

impl<G: Graph> NeighborLookup for MemoryStore<G> {
    fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, StoreError> {
        Ok(self.graph.neighbors(node))
    }
}

impl<G: Graph + Send + Sync> WalkStore for MemoryStore<G> {
    type Tx<'a>
        = MemoryTx<'a, G>
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>, StoreError> {
        Ok(MemoryTx { store: self, pending: Vec::new() })
    }

    fn generate_walk_id(&self) -> Result<WalkId, StoreError> {
        Ok(self.next_walk_id.fetch_add(1, Ordering::Relaxed))
    }

    fn walk_counts(&self, category: &str) -> Result<RankMap, StoreError> {
        let mut counts = RankMap::new();
        for s in self.segments.read().iter().filter(|s| s.category == category) {
            *counts.entry(s.edge.destination).or_insert(0.0) += 1.0;
        }
        Ok(counts)
    }

    /// Uniform sample without replacement (reservoir), shuffled.
    fn random_node_ids(&self, count: usize) -> Result<Vec<NodeId>, StoreError> {
        let ids = self.graph.node_ids();
        let mut rng = self.sampler.lock();
        let mut reservoir: Vec<NodeId> = Vec::with_capacity(count.min(ids.len()));
        for (i, id) in ids.into_iter().enumerate() {
            if i < count {
                reservoir.push(id);
            } else {
                let j = rng.random_range(0..=i);
                if j < count {
                    reservoir[j] = id;
                }
            }
        }
        reservoir.shuffle(&mut *rng);
        Ok(reservoir)
    }
}

/// Buffers segments until commit. Dropping it discards them.
#[derive(Debug)]
pub struct MemoryTx<'a, G> {
    store: &'a MemoryStore<G>,
    pending: Vec<WalkSegment>,
}

impl<G> WalkTransaction for MemoryTx<'_, G> {
    fn save_segment(&mut self, segment: WalkSegment) -> Result<(), StoreError> {
        self.pending.push(segment);
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        if !self.pending.is_empty() {
            tracing::trace!(segments = self.pending.len(), "commit");
            self.store.segments.write().extend(self.pending);
        }
        Ok(())
    }
}
