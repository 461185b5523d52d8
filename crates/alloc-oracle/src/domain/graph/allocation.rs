//! AllocationGraph - Shared Wait-For Graph
//!
//! # Thread Safety
//!
//! One `parking_lot::Mutex` per instance guards the whole graph. Writers
//! (`add_edge`) and scans (`detect_deadlock`, `find_cycle`) take the same
//! lock, so a scan never observes a half-written insert. Every method takes
//! `&self`; wrap the graph in `Arc` to share it between threads.
//!
//! ```text
//! AllocationGraph<N>
//!   └─ Mutex<WaitForGraph<N>>
//!        ├─ NodeInterner<N>   (id -> dense index)
//!        └─ Vec<Vec<usize>>   (adjacency)
//! ```
//!
//! Callers that prefer message passing over a lock use
//! [`GraphService`](crate::adapters::service::GraphService) instead.

use parking_lot::Mutex;

use super::types::{GraphNode, GraphStats, NodeId};
use super::wait_for::WaitForGraph;

/// Thread-safe resource-allocation graph
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use alloc_oracle::AllocationGraph;
///
/// let graph = Arc::new(AllocationGraph::<u64>::new());
///
/// let writers: Vec<_> = (0..4_u64)
///     .map(|t| {
///         let graph = Arc::clone(&graph);
///         std::thread::spawn(move || graph.add_edge(t, t + 1))
///     })
///     .collect();
/// for w in writers {
///     w.join().unwrap();
/// }
///
/// assert_eq!(graph.edge_count(), 4);
/// assert!(!graph.detect_deadlock());
/// ```
#[derive(Debug)]
pub struct AllocationGraph<N = NodeId> {
    inner: Mutex<WaitForGraph<N>>,
}

impl<N: GraphNode> AllocationGraph<N> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty graph with room for `nodes` identifiers
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            inner: Mutex::new(WaitForGraph::with_capacity(nodes)),
        }
    }

    /// Record that `from` waits for `to`
    ///
    /// Executes under the instance lock; concurrent callers are serialized.
    /// Has no error condition.
    pub fn add_edge(&self, from: N, to: N) {
        self.inner.lock().add_edge(from, to);
    }

    /// True iff the graph contains at least one directed cycle
    ///
    /// Holds the instance lock for the duration of the scan.
    pub fn detect_deadlock(&self) -> bool {
        self.inner.lock().detect_deadlock()
    }

    /// Node sequence of the first cycle found, entry node first
    pub fn find_cycle(&self) -> Option<Vec<N>> {
        self.inner.lock().find_cycle()
    }

    /// Identifiers `node` waits on, in insertion order
    pub fn waits_on(&self, node: N) -> Vec<N> {
        self.inner.lock().waits_on(node)
    }

    /// Distinct identifiers seen in any edge
    pub fn node_count(&self) -> usize {
        self.inner.lock().node_count()
    }

    /// Recorded edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.inner.lock().edge_count()
    }

    /// True if no edge has been recorded
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Node and edge counters, read under one lock
    pub fn stats(&self) -> GraphStats {
        self.inner.lock().stats()
    }

    /// Owned, internally consistent copy of the current graph
    ///
    /// Lets a caller run repeated scans without holding the lock.
    pub fn snapshot(&self) -> WaitForGraph<N> {
        self.inner.lock().clone()
    }

    /// Drop every node and edge
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Unwrap into the single-owner graph
    pub fn into_inner(self) -> WaitForGraph<N> {
        self.inner.into_inner()
    }
}

impl<N: GraphNode> Default for AllocationGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode> From<WaitForGraph<N>> for AllocationGraph<N> {
    fn from(graph: WaitForGraph<N>) -> Self {
        Self {
            inner: Mutex::new(graph),
        }
    }
}

impl<N: GraphNode> Extend<(N, N)> for AllocationGraph<N> {
    fn extend<I: IntoIterator<Item = (N, N)>>(&mut self, edges: I) {
        // exclusive access, no locking needed
        self.inner.get_mut().extend(edges);
    }
}

impl<N: GraphNode> FromIterator<(N, N)> for AllocationGraph<N> {
    fn from_iter<I: IntoIterator<Item = (N, N)>>(edges: I) -> Self {
        WaitForGraph::from_iter(edges).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_graph_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AllocationGraph<NodeId>>();
    }

    #[test]
    fn test_edge_cases() {
        let graph = AllocationGraph::new();
        assert!(!graph.detect_deadlock());

        graph.add_edge(NodeId(1), NodeId(2));
        graph.add_edge(NodeId(2), NodeId(3));
        assert!(!graph.detect_deadlock());

        graph.add_edge(NodeId(3), NodeId(1));
        assert!(graph.detect_deadlock());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let graph: AllocationGraph<u32> = [(1, 2), (2, 1)].into_iter().collect();
        let first = graph.detect_deadlock();
        let second = graph.detect_deadlock();
        assert_eq!(first, second);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_edges() {
        let graph = Arc::new(AllocationGraph::<u64>::new());
        let handles: Vec<_> = (0..8_u64)
            .map(|t| {
                let graph = Arc::clone(&graph);
                thread::spawn(move || {
                    for i in 0..500_u64 {
                        graph.add_edge(t * 1_000 + i, t * 1_000 + i + 1);
                        if i % 50 == 0 {
                            let _ = graph.detect_deadlock();
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(graph.edge_count(), 8 * 500);
        assert_eq!(graph.node_count(), 8 * 501);
        assert!(!graph.detect_deadlock());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let graph: AllocationGraph<u8> = [(1, 2)].into_iter().collect();
        let snapshot = graph.snapshot();
        graph.add_edge(2, 1);

        assert!(graph.detect_deadlock());
        assert!(!snapshot.detect_deadlock());
        assert_eq!(snapshot.edge_count(), 1);
    }

    #[test]
    fn test_extend_then_unwrap() {
        let mut graph = AllocationGraph::new();
        graph.extend([(1_u8, 2), (2, 3)]);
        assert!(!graph.detect_deadlock());

        graph.extend(std::iter::once((3, 1)));
        let inner = graph.into_inner();
        assert_eq!(inner.find_cycle(), Some(vec![1, 2, 3]));
    }
}
