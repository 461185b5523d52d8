//! Allocation Oracle
//!
//! # Overview
//!
//! `alloc-oracle` is consulted by an allocator or scheduler *before* it
//! grants a resource. It answers two questions:
//!
//! - **Detection**: does the current wait-for graph contain a circular wait?
//!   ([`AllocationGraph`], [`WaitForGraph`], [`GraphService`])
//! - **Avoidance**: is this allocation state, or this additional grant, safe
//!   under the Banker's Algorithm? ([`SafetyChecker`])
//!
//! It does not schedule threads, manage process lifecycles, or implement a
//! lock. Locks are reached through the [`MutualExclusion`] capability.
//!
//! # Architecture
//!
//! - **Domain**: graph, banker, timestamp policies, lock capability
//! - **Adapters**: channel-driven graph service, `parking_lot` lock
//!
//! # Usage
//!
//! ```rust
//! use alloc_oracle::{AllocationGraph, Matrix, NodeId, SafetyChecker};
//!
//! // Detection: P1 waits for P2, P2 waits for P1
//! let graph = AllocationGraph::new();
//! graph.add_edge(NodeId(1), NodeId(2));
//! graph.add_edge(NodeId(2), NodeId(1));
//! assert!(graph.detect_deadlock());
//!
//! // Avoidance: one process, one resource kind
//! let max = Matrix::from_rows(vec![vec![2]]).unwrap();
//! let alloc = Matrix::from_rows(vec![vec![1]]).unwrap();
//! let need = max.checked_sub(&alloc).unwrap();
//! assert!(SafetyChecker::is_safe(&[1], &max, &alloc, &need).unwrap());
//! assert!(!SafetyChecker::is_safe(&[0], &max, &alloc, &need).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;

pub use adapters::{GraphHandle, GraphService, ParkingLock};
pub use config::OracleConfig;
pub use domain::{
    AllocationGraph, AllocationSnapshot, AllocationState, GrantDecision, GraphNode, GraphStats,
    Matrix, MutualExclusion, NodeId, Resolution, SafetyChecker, SafetyReport, Timestamp,
    TimestampPolicy, WaitForGraph,
};
pub use error::{OracleError, OracleResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
