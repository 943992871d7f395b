//! Batch configuration.

use crate::graph::GLOBAL_CATEGORY;

/// How much walk work one storage transaction covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TxScope {
    /// One transaction per walk; a failure loses only the walk in flight.
    #[default]
    PerWalk,
    /// One transaction per worker slice; a failure loses the whole slice.
    PerSlice,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchConfig {
    /// Start nodes requested from storage by [`crate::WalkCoordinator::run_batch`].
    pub batch_size: usize,
    pub workers: usize,
    /// Per-step termination probability, within `[0, 1]`.
    pub epsilon: f64,
    pub category: String,
    /// Base seed; worker `i` draws from a stream derived from `(seed, i)`.
    pub seed: u64,
    pub tx_scope: TxScope,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 200_000,
            workers: 4,
            epsilon: 0.15,
            category: GLOBAL_CATEGORY.to_string(),
            seed: 42,
            tx_scope: TxScope::PerWalk,
        }
    }
}
