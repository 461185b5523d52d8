//! Wait-For Graph & Deadlock Detection
//!
//! # Architecture
//!
//! ```text
//! domain/graph/
//! ├── types.rs       NodeId, GraphNode bound, GraphStats
//! ├── interner.rs    external id <-> dense index
//! ├── bitset.rs      color sets keyed by dense index
//! ├── detector.rs    iterative three-color DFS
//! ├── wait_for.rs    WaitForGraph (single owner, &mut self)
//! ├── allocation.rs  AllocationGraph (Mutex-guarded, &self)
//! └── proof.rs       Kani proofs
//! ```
//!
//! An edge `a -> b` means "`a` waits for `b`". Edges may connect processes
//! to resources, resources to their holders, or processes directly; the
//! detector only cares about direction. A deadlock is any directed cycle.
//!
//! Edges are never removed individually. Callers that need a fresh view call
//! `clear()` or build a new graph.

pub mod allocation;
pub mod bitset;
pub mod detector;
pub mod interner;
pub mod types;
pub mod wait_for;

#[cfg(kani)]
mod proof;

pub use allocation::AllocationGraph;
pub use detector::CycleDetector;
pub use types::{GraphNode, GraphStats, NodeId};
pub use wait_for::WaitForGraph;
