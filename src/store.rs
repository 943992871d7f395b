//! Storage contract consumed by the walk engine.
//!
//! The engine never names a backend. It only needs:
//! - out-neighbors of a node ([`NeighborLookup`])
//! - fresh walk ids, transactions, per-category landing counts and start-node sampling
//!   ([`WalkStore`])
//! - durable segment writes inside a transaction ([`WalkTransaction`])
//!
//! Thread-safety for concurrent readers and writers is the backend's job; the engine holds no
//! locks of its own.

use crate::graph::{NodeId, WalkId, WalkSegment};
use crate::rank::RankMap;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Out-neighbor lookup.
pub trait NeighborLookup {
    /// Finite out-neighbor list of `node`. An empty list is a dead end, not an error.
    fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, StoreError>;
}

/// Everything a batch of walks needs from storage.
pub trait WalkStore: NeighborLookup + Send + Sync {
    type Tx<'a>: WalkTransaction
    where
        Self: 'a;

    /// Open a transaction. Segments saved through it become visible together on commit, or not
    /// at all.
    fn begin(&self) -> Result<Self::Tx<'_>, StoreError>;

    /// A walk id never returned before. Safe to call from many workers at once.
    fn generate_walk_id(&self) -> Result<WalkId, StoreError>;

    /// Landing count per node over every committed segment tagged `category`.
    ///
    /// Nodes without segments are absent (implicitly zero).
    fn walk_counts(&self, category: &str) -> Result<RankMap, StoreError>;

    /// Up to `count` node ids to seed a batch of walks. The sampling policy is the backend's.
    fn random_node_ids(&self, count: usize) -> Result<Vec<NodeId>, StoreError>;
}

/// A unit of walk work. Dropping it without [`commit`](WalkTransaction::commit) discards
/// everything saved through it.
pub trait WalkTransaction {
    fn save_segment(&mut self, segment: WalkSegment) -> Result<(), StoreError>;

    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;

    fn rollback(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}
