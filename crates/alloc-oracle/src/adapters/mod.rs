//! Adapters Layer
//!
//! Connects the pure domain to the outside world:
//!
//! - `service`: tokio task that owns a `WaitForGraph` and serves it over
//!   channels, the lock-free alternative to `AllocationGraph`
//! - `raw_lock`: a `MutualExclusion` implementation over `parking_lot`

pub mod raw_lock;
pub mod service;

pub use raw_lock::ParkingLock;
pub use service::{GraphHandle, GraphService};
