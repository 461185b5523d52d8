//! Deadlock Avoidance - Banker's Algorithm
//!
//! # Module Structure
//!
//! ```text
//! domain/banker/
//! ├── matrix.rs   flat row-major Matrix with checked constructors
//! ├── state.rs    AllocationState (validated available/max/allocation/need)
//! └── checker.rs  SafetyChecker: is_safe, check, evaluate_request
//! ```
//!
//! A state is *safe* if some order exists in which every process can obtain
//! its remaining need, finish, and hand its allocation back. The checker
//! holds no state between calls.

pub mod checker;
pub mod matrix;
pub mod state;

pub use checker::{GrantDecision, SafetyChecker, SafetyReport};
pub use matrix::Matrix;
pub use state::{AllocationSnapshot, AllocationState};
