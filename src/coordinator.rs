//! Fork-join execution of a batch of walks.
//!
//! The batch is cut into `workers` contiguous slices of `ceil(n / workers)` start nodes. Each
//! slice runs on its own pool thread with its own generator and its own transactions; there is
//! no work stealing between slices and no state shared beyond the store and the input ids.

use crate::config::{BatchConfig, TxScope};
use crate::graph::NodeId;
use crate::random_walk::validate_epsilon;
use crate::rng::SeededSource;
use crate::store::{WalkStore, WalkTransaction};
use crate::walker::Walker;
use crate::{Error, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Split `0..len` into `workers` contiguous ranges of `ceil(len / workers)` indices.
///
/// Every index lands in exactly one range. Trailing ranges are empty when `len` does not fill
/// all workers. Returns no ranges for `workers == 0`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }
    let chunk = len.div_ceil(workers);
    (0..workers)
        .map(|i| {
            let start = (i * chunk).min(len);
            let end = (start + chunk).min(len);
            start..end
        })
        .collect()
}

/// Outcome of one worker's slice.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker: usize,
    /// Indices into the batch this worker owned.
    pub range: Range<usize>,
    /// Committed walks.
    pub walks: usize,
    /// Recorded steps over committed walks.
    pub steps: u64,
    /// Failure that stopped the slice early, if any.
    pub error: Option<Error>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub workers: Vec<WorkerReport>,
}

impl BatchReport {
    pub fn total_walks(&self) -> usize {
        self.workers.iter().map(|w| w.walks).sum()
    }

    pub fn total_steps(&self) -> u64 {
        self.workers.iter().map(|w| w.steps).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|w| w.error.is_some())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalkCoordinator {
    config: BatchConfig,
}

impl WalkCoordinator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn validate(&self) -> Result<()> {
        validate_epsilon(self.config.epsilon)?;
        if self.config.workers == 0 {
            return Err(Error::InvalidParameter("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Sample `batch_size` start nodes from the store and walk from each of them.
    pub fn run_batch<S: WalkStore + ?Sized>(&self, store: &S) -> Result<BatchReport> {
        self.validate()?;
        let ids = store.random_node_ids(self.config.batch_size)?;
        tracing::info!(
            requested = self.config.batch_size,
            sampled = ids.len(),
            workers = self.config.workers,
            "starting walk batch"
        );
        self.run(store, &ids)
    }

    /// Walk from every id in `start_nodes`, one walk per id.
    ///
    /// Parameter errors are returned before any walk starts. Storage failures do not fail the
    /// batch: each one stops only its own worker and shows up in that worker's report, while
    /// walks other workers committed stay committed.
    pub fn run<S: WalkStore + ?Sized>(&self, store: &S, start_nodes: &[NodeId]) -> Result<BatchReport> {
        self.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("walk-worker-{i}"))
            .build()?;

        let ranges = partition(start_nodes.len(), self.config.workers);
        let workers = pool.install(|| {
            ranges
                .into_par_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let ids = &start_nodes[range.clone()];
                    self.run_worker(store, worker, range, ids)
                })
                .collect::<Vec<_>>()
        });

        let report = BatchReport { workers };
        for failed in report.failures() {
            if let Some(err) = &failed.error {
                tracing::warn!(worker = failed.worker, error = %err, "worker stopped early");
            }
        }
        Ok(report)
    }

    fn run_worker<S: WalkStore + ?Sized>(
        &self,
        store: &S,
        worker: usize,
        range: Range<usize>,
        ids: &[NodeId],
    ) -> WorkerReport {
        tracing::debug!(worker, walks = ids.len(), "worker started");
        let mut walker = Walker::new(store, SeededSource::for_worker(self.config.seed, worker));
        let mut report = WorkerReport { worker, range, walks: 0, steps: 0, error: None };

        let result = match self.config.tx_scope {
            TxScope::PerWalk => self.walk_each(&mut walker, ids, &mut report),
            TxScope::PerSlice => self.walk_slice(store, &mut walker, ids, &mut report),
        };
        if let Err(err) = result {
            report.error = Some(err);
        }
        report
    }

    fn walk_each<S: WalkStore + ?Sized>(
        &self,
        walker: &mut Walker<'_, S>,
        ids: &[NodeId],
        report: &mut WorkerReport,
    ) -> Result<()> {
        let BatchConfig { epsilon, category, .. } = &self.config;
        for &start in ids {
            let summary = walker.walk(start, *epsilon, category)?;
            report.walks += 1;
            report.steps += summary.outcome.steps;
        }
        Ok(())
    }

    fn walk_slice<S: WalkStore + ?Sized>(
        &self,
        store: &S,
        walker: &mut Walker<'_, S>,
        ids: &[NodeId],
        report: &mut WorkerReport,
    ) -> Result<()> {
        let BatchConfig { epsilon, category, .. } = &self.config;
        let mut tx = store.begin()?;
        let mut steps = 0;
        for &start in ids {
            steps += walker.walk_in(&mut tx, start, *epsilon, category)?.outcome.steps;
        }
        tx.commit()?;
        report.walks += ids.len();
        report.steps += steps;
        Ok(())
    }
}
