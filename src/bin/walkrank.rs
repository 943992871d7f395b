//! walkrank CLI
//!
//! Loads a directed edge list into the in-memory store, runs one batch of epsilon-terminated
//! walks across a fixed worker pool, and prints the highest-ranked nodes. With the `petgraph`
//! feature, `--backend petgraph` keeps the topology in a `petgraph::Graph` instead.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walkrank::{
    compute_ranks, top_k, AdjacencyList, BatchConfig, Graph, MemoryStore, TxScope,
    WalkCoordinator, GLOBAL_CATEGORY,
};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum TxScopeArg {
    PerWalk,
    PerSlice,
}

impl From<TxScopeArg> for TxScope {
    fn from(arg: TxScopeArg) -> Self {
        match arg {
            TxScopeArg::PerWalk => TxScope::PerWalk,
            TxScopeArg::PerSlice => TxScope::PerSlice,
        }
    }
}

#[cfg(feature = "petgraph")]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum BackendArg {
    Adjacency,
    Petgraph,
}

#[derive(Parser, Debug)]
#[command(name = "walkrank")]
#[command(author, version, about = "Monte Carlo PageRank from recorded random walks")]
struct Cli {
    /// Directed edge list: `src dst` per line, a lone id declares an isolated node.
    #[arg(long)]
    edges: PathBuf,

    /// Number of start nodes sampled for the batch.
    #[arg(long, default_value_t = 200_000)]
    batch_size: usize,

    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Per-step termination probability.
    #[arg(long, default_value_t = 0.15)]
    epsilon: f64,

    #[arg(long, default_value = GLOBAL_CATEGORY)]
    category: String,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = TxScopeArg::PerWalk)]
    tx_scope: TxScopeArg,

    /// How many ranked nodes to print.
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Topology structure behind the in-memory store.
    #[cfg(feature = "petgraph")]
    #[arg(long, value_enum, default_value_t = BackendArg::Adjacency)]
    backend: BackendArg,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    let txt = std::fs::read_to_string(&cli.edges)
        .with_context(|| format!("failed to read {}", cli.edges.display()))?;
    let graph = AdjacencyList::parse_edgelist(&txt)
        .with_context(|| format!("failed to parse {}", cli.edges.display()))?;
    if graph.node_count() == 0 {
        bail!("{} contains no nodes", cli.edges.display());
    }
    tracing::info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");

    let config = BatchConfig {
        batch_size: cli.batch_size,
        workers: cli.workers,
        epsilon: cli.epsilon,
        category: cli.category.clone(),
        seed: cli.seed,
        tx_scope: cli.tx_scope.into(),
    };

    #[cfg(feature = "petgraph")]
    if cli.backend == BackendArg::Petgraph {
        let graph = graph.to_petgraph().context("failed to build petgraph topology")?;
        return run(MemoryStore::with_seed(graph, config.seed), config, cli.top);
    }
    run(MemoryStore::with_seed(graph, config.seed), config, cli.top)
}

fn run<G>(store: MemoryStore<G>, config: BatchConfig, top: usize) -> Result<()>
where
    G: Graph + Send + Sync,
{
    tracing::info!(nodes = store.graph().node_count(), "store ready");
    let coordinator = WalkCoordinator::new(config);

    let report = coordinator.run_batch(&store)?;
    for w in report.failures() {
        if let Some(err) = &w.error {
            eprintln!("worker {} failed after {} walks: {err}", w.worker, w.walks);
        }
    }
    println!(
        "{} walks, {} segments across {} workers",
        report.total_walks(),
        report.total_steps(),
        report.workers.len()
    );

    let ranks = compute_ranks(&store, &coordinator.config().category)?;
    for (i, (node, score)) in top_k(&ranks, top).into_iter().enumerate() {
        println!("{:>4}  {:<12} {:.6}", i + 1, node, score);
    }

    if !report.is_complete() {
        bail!("{} worker(s) failed", report.failures().count());
    }
    Ok(())
}
