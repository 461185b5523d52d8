//! Core Types for the Wait-For Graph

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Bound satisfied by anything usable as a graph node identifier
///
/// Process ids, resource ids, or opaque handles all qualify as long as they
/// are cheap to copy and hashable. Blanket-implemented.
pub trait GraphNode: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> GraphNode for T {}

/// Default node identifier (process or resource)
///
/// # Example
///
/// ```rust
/// use alloc_oracle::domain::graph::NodeId;
///
/// let p = NodeId::new(7);
/// assert_eq!(p.as_u64(), 7);
/// assert_eq!(p.to_string(), "n7");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new node identifier
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    #[inline(always)]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Point-in-time graph counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Distinct identifiers seen in any edge
    pub nodes: usize,
    /// Edges recorded, duplicates included
    pub edges: usize,
}
