//! `walkrank`: Monte Carlo PageRank approximation from recorded random walks.
//!
//! Instead of iterating a transition matrix to convergence, walks are started from a batch
//! of nodes, every non-self-loop step is persisted as a [`WalkSegment`], and node importance
//! is read back as the normalized number of segments landing on each node.
//!
//! Public invariants (must not drift):
//! - **Dense steps**: the segments of one walk carry step indices `0..k` with no gaps.
//! - **No self-loop segments**: a walk that picks its own node as the next hop records nothing
//!   and does not advance its step index.
//! - **Explicit termination**: a walk ends when a uniform draw falls below epsilon, or at a dead
//!   end. With `epsilon == 0` on a cyclic graph it does not end; nothing caps it silently.
//! - **Visited-only normalization**: ranks are divided by the sum over visited nodes, never by
//!   the node count (see [`rank::normalize_counts`]).
//! - **Worker isolation**: each worker owns its generator and its transactions; one worker's
//!   storage failure never aborts another's committed or in-flight walks.
//!
//! Swappable (allowed to change without breaking the contract):
//! - the storage backend behind [`WalkStore`]
//! - the generator behind [`RandomSource`]
//! - transaction granularity ([`TxScope`])

pub mod config;
pub mod coordinator;
pub mod graph;
pub mod memory;
pub mod random_walk;
pub mod rank;
pub mod rng;
pub mod segment;
pub mod store;
pub mod walker;

pub use config::{BatchConfig, TxScope};
pub use coordinator::{partition, BatchReport, WalkCoordinator, WorkerReport};
pub use graph::{
    AdjacencyList, Edge, Graph, NodeId, WalkId, WalkSegment, GLOBAL_CATEGORY,
};
pub use memory::MemoryStore;
pub use random_walk::{
    sample_walk, validate_epsilon, walk_edges, StopReason, TraversedEdge, WalkOutcome,
};
pub use rank::{compute_ranks, normalize_counts, top_k, RankMap};
pub use rng::{RandomSource, SeededSource};
pub use segment::SegmentRecorder;
pub use store::{NeighborLookup, StoreError, WalkStore, WalkTransaction};
pub use walker::{WalkSummary, Walker};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("edge list line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
