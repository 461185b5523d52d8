//! Dense index assignment for external node identifiers
//!
//! The detector works on `0..len` indices so its color sets can be bitsets.
//! Indices are handed out in first-seen order and never reused.

use std::collections::HashMap;

use super::types::GraphNode;

/// Bidirectional map between external identifiers and dense indices
#[derive(Debug, Clone)]
pub struct NodeInterner<N> {
    index_of: HashMap<N, usize>,
    nodes: Vec<N>,
}

impl<N: GraphNode> NodeInterner<N> {
    /// Create an empty interner
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an interner with room for `capacity` identifiers
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index_of: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Dense index for `node`, assigning the next one if unseen
    pub fn intern(&mut self, node: N) -> usize {
        if let Some(&idx) = self.index_of.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.index_of.insert(node, idx);
        idx
    }

    /// Dense index for `node` if it has been seen
    #[inline]
    pub fn get(&self, node: &N) -> Option<usize> {
        self.index_of.get(node).copied()
    }

    /// External identifier for a dense index
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not produced by this interner.
    #[inline]
    pub fn resolve(&self, idx: usize) -> N {
        self.nodes[idx]
    }

    /// Identifiers in index order
    #[inline]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of interned identifiers
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing has been interned
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Forget every identifier
    pub fn clear(&mut self) {
        self.index_of.clear();
        self.nodes.clear();
    }
}

impl<N: GraphNode> Default for NodeInterner<N> {
    fn default() -> Self {
        Self::new()
    }
}
