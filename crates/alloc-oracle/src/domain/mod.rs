//! Domain Layer
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Graph Module                  Banker Module                │
//! │  ├─ WaitForGraph<N>            ├─ Matrix                    │
//! │  ├─ AllocationGraph<N>         ├─ AllocationState           │
//! │  └─ CycleDetector              └─ SafetyChecker             │
//! │                                                             │
//! │  Policy Module                 Lock Module                  │
//! │  └─ TimestampPolicy            └─ MutualExclusion (trait)   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The graph and banker modules share no state and do not depend on each
//! other. Nothing in this layer touches a runtime or performs I/O.

pub mod banker;
pub mod graph;
pub mod lock;
pub mod policy;

pub use banker::{
    AllocationSnapshot, AllocationState, GrantDecision, Matrix, SafetyChecker, SafetyReport,
};
pub use graph::{AllocationGraph, CycleDetector, GraphNode, GraphStats, NodeId, WaitForGraph};
pub use lock::MutualExclusion;
pub use policy::{Resolution, Timestamp, TimestampPolicy};
