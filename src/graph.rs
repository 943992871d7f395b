//! Node identifiers, walk records, and the minimal topology adapter.

use std::collections::BTreeMap;

/// Opaque vertex identifier.
pub type NodeId = u64;

/// Identifier of one complete walk, handed out by storage.
pub type WalkId = u64;

/// Category used when callers do not partition walks.
pub const GLOBAL_CATEGORY: &str = "global";

/// A directed edge. Self-loops are valid graph edges but never become walk segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub destination: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, destination: NodeId) -> Self {
        Self { source, destination }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }
}

/// One recorded step of a walk.
///
/// Segments are written once by [`crate::SegmentRecorder`] and owned by storage afterwards.
/// Within a walk, `step` runs `0, 1, 2, ...` without gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkSegment {
    pub walk_id: WalkId,
    pub edge: Edge,
    pub category: String,
    pub step: u64,
}

/// Read-only topology view.
///
/// Neighbor order is whatever the backing structure yields; samplers must not depend on it.
pub trait Graph {
    fn node_count(&self) -> usize;
    fn node_ids(&self) -> Vec<NodeId>;
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;
    fn out_degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }
}

/// Directed adjacency lists keyed by node id.
///
/// Parallel edges are kept (a doubled edge is twice as likely to be walked), and so are
/// self-loops. Unknown nodes have no neighbors.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyList {
    adj: BTreeMap<NodeId, Vec<NodeId>>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut g = Self::new();
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Add a node without outgoing edges. No-op if it already exists.
    pub fn add_node(&mut self, node: NodeId) {
        self.adj.entry(node).or_default();
    }

    pub fn add_edge(&mut self, source: NodeId, destination: NodeId) {
        self.adj.entry(source).or_default().push(destination);
        self.add_node(destination);
    }

    pub fn edge_count(&self) -> usize {
        self.adj.values().map(Vec::len).sum()
    }

    /// Parse a directed edge list.
    ///
    /// One `source destination` pair per line, whitespace separated. A line holding a single
    /// id declares an isolated node. Blank lines and lines starting with `#` are ignored.
    pub fn parse_edgelist(txt: &str) -> crate::Result<Self> {
        let mut g = Self::new();

        for (line_no, line) in txt.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = line_no + 1;
            let mut it = line.split_whitespace();
            let u = match it.next() {
                Some(a) => parse_node(a, line_no)?,
                None => continue,
            };
            match it.next() {
                Some(b) => {
                    let v = parse_node(b, line_no)?;
                    g.add_edge(u, v);
                }
                None => g.add_node(u),
            }
            if let Some(extra) = it.next() {
                return Err(crate::Error::Parse {
                    line: line_no,
                    reason: format!("unexpected trailing field '{extra}'"),
                });
            }
        }

        Ok(g)
    }
}

fn parse_node(field: &str, line: usize) -> crate::Result<NodeId> {
    field.parse().map_err(|e| crate::Error::Parse {
        line,
        reason: format!("bad node id '{field}': {e}"),
    })
}

impl Graph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.adj.len()
    }
    fn node_ids(&self) -> Vec<NodeId> {
        self.adj.keys().copied().collect()
    }
    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.adj.get(&node).cloned().unwrap_or_default()
    }
    fn out_degree(&self, node: NodeId) -> usize {
        self.adj.get(&node).map_or(0, Vec::len)
    }
}

#[cfg(feature = "petgraph")]
impl<N, E, Ix> Graph for petgraph::Graph<N, E, petgraph::Directed, Ix>
where
    Ix: petgraph::graph::IndexType,
{
    fn node_count(&self) -> usize {
        self.node_count()
    }
    fn node_ids(&self) -> Vec<NodeId> {
        self.node_indices().map(|idx| idx.index() as NodeId).collect()
    }
    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let Ok(node) = usize::try_from(node) else {
            return Vec::new();
        };
        if node >= self.node_count() {
            return Vec::new();
        }
        self.neighbors(petgraph::graph::NodeIndex::new(node))
            .map(|idx| idx.index() as NodeId)
            .collect()
    }
}

#[cfg(feature = "petgraph")]
impl AdjacencyList {
    /// Copy into a `petgraph` digraph whose node index is the node id.
    ///
    /// Ids below the largest declared id that never appeared become isolated nodes.
    pub fn to_petgraph(&self) -> crate::Result<petgraph::Graph<(), ()>> {
        use petgraph::graph::NodeIndex;

        let Some(&max) = self.adj.keys().next_back() else {
            return Ok(petgraph::Graph::new());
        };
        let bound = u32::try_from(max)
            .ok()
            .filter(|&m| m < u32::MAX)
            .ok_or_else(|| {
                crate::Error::InvalidParameter(format!(
                    "node id {max} does not fit a petgraph index"
                ))
            })?;

        let mut g = petgraph::Graph::with_capacity(bound as usize + 1, self.edge_count());
        for _ in 0..=bound {
            g.add_node(());
        }
        for (&u, targets) in &self.adj {
            for &v in targets {
                g.add_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), ());
            }
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edgelist_keeps_self_loops_and_isolated_nodes() {
        let txt = "# toy graph\n1 2\n2 2\n\n2 3\n4\n";
        let g = AdjacencyList::parse_edgelist(txt).unwrap();
        assert_eq!(g.node_ids(), vec![1, 2, 3, 4]);
        assert_eq!(g.neighbors(2), vec![2, 3]);
        assert!(g.neighbors(4).is_empty());
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn parse_edgelist_reports_line_numbers() {
        let err = AdjacencyList::parse_edgelist("1 2\n\n3 x\n").unwrap_err();
        match err {
            crate::Error::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
        assert!(AdjacencyList::parse_edgelist("1 2 3").is_err());
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let g = AdjacencyList::from_edges([(1, 2)]);
        assert!(g.neighbors(99).is_empty());
        assert_eq!(g.out_degree(1), 1);
        assert!(Edge::new(3, 3).is_self_loop());
    }

    #[cfg(feature = "petgraph")]
    #[test]
    fn petgraph_copy_keeps_ids_and_edges() {
        let g = AdjacencyList::from_edges([(0, 1), (1, 1), (1, 3), (1, 3)]);
        let pg = g.to_petgraph().unwrap();

        assert_eq!(Graph::node_count(&pg), 4);
        let mut nbrs = Graph::neighbors(&pg, 1);
        nbrs.sort_unstable();
        assert_eq!(nbrs, vec![1, 3, 3]);
        // Never declared, so isolated.
        assert!(Graph::neighbors(&pg, 2).is_empty());
        assert!(Graph::neighbors(&pg, 99).is_empty());

        assert_eq!(AdjacencyList::new().to_petgraph().unwrap().node_count(), 0);
        assert!(AdjacencyList::from_edges([(0, u64::MAX)]).to_petgraph().is_err());
    }
}
