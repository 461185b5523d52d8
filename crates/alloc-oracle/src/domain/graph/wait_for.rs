//! WaitForGraph - Single-Owner Wait-For Graph
//!
//! Plain `&mut self` graph used directly by single-threaded callers, by the
//! channel-driven service task, and (behind a mutex) by [`AllocationGraph`].
//!
//! [`AllocationGraph`]: super::AllocationGraph

use tracing::{debug, trace, warn};

use super::detector::CycleDetector;
use super::interner::NodeInterner;
use super::types::{GraphNode, GraphStats, NodeId};

/// Directed "waits-for" graph over identifiers of type `N`
///
/// # Data Structures
///
/// - **Interner**: external identifier -> dense index (first-seen order)
/// - **Adjacency list**: `adjacency[i]` = dense targets `i` waits on,
///   duplicates kept
///
/// `adjacency.len()` always equals the number of interned nodes, so a node
/// with no outgoing edges still has an (empty) slot.
///
/// # Example
///
/// ```rust
/// use alloc_oracle::domain::graph::{NodeId, WaitForGraph};
///
/// let mut graph = WaitForGraph::new();
/// graph.add_edge(NodeId(1), NodeId(2));
/// graph.add_edge(NodeId(2), NodeId(3));
/// assert!(!graph.detect_deadlock());
///
/// graph.add_edge(NodeId(3), NodeId(1));
/// assert!(graph.detect_deadlock());
/// assert_eq!(graph.find_cycle(), Some(vec![NodeId(1), NodeId(2), NodeId(3)]));
/// ```
#[derive(Debug, Clone)]
pub struct WaitForGraph<N = NodeId> {
    interner: NodeInterner<N>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<N: GraphNode> WaitForGraph<N> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty graph with room for `nodes` identifiers
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            interner: NodeInterner::with_capacity(nodes),
            adjacency: Vec::with_capacity(nodes),
            edge_count: 0,
        }
    }

    fn slot(&mut self, node: N) -> usize {
        let idx = self.interner.intern(node);
        if idx == self.adjacency.len() {
            self.adjacency.push(Vec::new());
        }
        idx
    }

    /// Record that `from` waits for `to`
    ///
    /// Never fails: unseen identifiers become nodes, duplicates are kept and
    /// self-loops are legal (they are a trivial deadlock).
    pub fn add_edge(&mut self, from: N, to: N) {
        let from_idx = self.slot(from);
        let to_idx = self.slot(to);
        self.adjacency[from_idx].push(to_idx);
        self.edge_count += 1;
        trace!(?from, ?to, edges = self.edge_count, "wait edge recorded");
    }

    /// True iff the graph contains a directed cycle
    ///
    /// Every node is tried as an entry point, so cycles in components
    /// unreachable from earlier nodes are still found. Only the verdict is
    /// computed; use [`find_cycle`](Self::find_cycle) for the members.
    pub fn detect_deadlock(&self) -> bool {
        let found = CycleDetector::new().has_cycle(&self.adjacency);
        if found {
            warn!(
                nodes = self.node_count(),
                edges = self.edge_count,
                "circular wait detected"
            );
        } else {
            self.log_acyclic();
        }
        found
    }

    /// Node sequence of the first cycle found, entry node first
    ///
    /// `[a, b, c]` means `a -> b -> c -> a`. A self-loop on `x` is `[x]`.
    pub fn find_cycle(&self) -> Option<Vec<N>> {
        let Some(path) = CycleDetector::new().find_cycle(&self.adjacency) else {
            self.log_acyclic();
            return None;
        };

        let nodes: Vec<N> = path.into_iter().map(|i| self.interner.resolve(i)).collect();
        warn!(length = nodes.len(), "circular wait detected");
        debug!(cycle = ?nodes, "cycle members");
        Some(nodes)
    }

    fn log_acyclic(&self) {
        debug!(
            nodes = self.node_count(),
            edges = self.edge_count,
            "wait-for graph is acyclic"
        );
    }

    /// Identifiers `node` waits on, in insertion order (duplicates kept)
    pub fn waits_on(&self, node: N) -> Vec<N> {
        self.interner
            .get(&node)
            .map(|idx| {
                self.adjacency[idx]
                    .iter()
                    .map(|&to| self.interner.resolve(to))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Identifiers seen so far, in first-seen order
    pub fn nodes(&self) -> &[N] {
        self.interner.nodes()
    }

    /// Distinct identifiers seen in any edge
    #[inline]
    pub fn node_count(&self) -> usize {
        self.interner.len()
    }

    /// Recorded edges, duplicates included
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True if no edge has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Node and edge counters
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count,
        }
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.interner.clear();
        self.adjacency.clear();
        self.edge_count = 0;
    }
}

impl<N: GraphNode> Default for WaitForGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode> Extend<(N, N)> for WaitForGraph<N> {
    fn extend<I: IntoIterator<Item = (N, N)>>(&mut self, edges: I) {
        for (from, to) in edges {
            self.add_edge(from, to);
        }
    }
}

impl<N: GraphNode> FromIterator<(N, N)> for WaitForGraph<N> {
    fn from_iter<I: IntoIterator<Item = (N, N)>>(edges: I) -> Self {
        let mut graph = Self::new();
        graph.extend(edges);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let graph: WaitForGraph = WaitForGraph::new();
        assert!(graph.is_empty());
        assert!(!graph.detect_deadlock());
        assert_eq!(graph.find_cycle(), None);
    }

    #[test]
    fn test_self_loop_is_deadlock() {
        let mut graph = WaitForGraph::new();
        graph.add_edge(NodeId(4), NodeId(4));
        assert!(graph.detect_deadlock());
        assert_eq!(graph.find_cycle(), Some(vec![NodeId(4)]));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_mutual_wait() {
        let graph: WaitForGraph<u32> = [(1, 2), (2, 1)].into_iter().collect();
        assert!(graph.detect_deadlock());
    }

    #[test]
    fn test_fan_out_without_return_edge() {
        let graph: WaitForGraph<u32> = [(1, 2), (1, 3)].into_iter().collect();
        assert!(!graph.detect_deadlock());
    }

    #[test]
    fn test_waits_on_keeps_duplicates() {
        let mut graph = WaitForGraph::new();
        graph.add_edge("p1", "r1");
        graph.add_edge("p1", "r2");
        graph.add_edge("p1", "r1");
        assert_eq!(graph.waits_on("p1"), vec!["r1", "r2", "r1"]);
        assert!(graph.waits_on("r1").is_empty());
        assert!(graph.waits_on("unknown").is_empty());
        assert_eq!(graph.stats(), GraphStats { nodes: 3, edges: 3 });
    }

    #[test]
    fn test_process_resource_cycle() {
        // P1 holds R1 and wants R2, P2 holds R2 and wants R1
        let mut graph = WaitForGraph::new();
        graph.add_edge("R1", "P1");
        graph.add_edge("P1", "R2");
        graph.add_edge("R2", "P2");
        graph.add_edge("P2", "R1");

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle, vec!["R1", "P1", "R2", "P2"]);
    }

    #[test]
    fn test_clear_resets() {
        let mut graph: WaitForGraph<u8> = [(1, 1)].into_iter().collect();
        assert!(graph.detect_deadlock());
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert!(!graph.detect_deadlock());
    }
}
