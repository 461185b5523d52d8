//! Mutual-Exclusion Capability
//!
//! # Boundary Contract
//!
//! The oracle never implements or inspects a lock. Whatever primitive the
//! surrounding allocator uses is reached only through this capability set:
//!
//! ```text
//! ┌──────────────┐  try_acquire / acquire / acquire_with_timeout / release
//! │  allocator   │ ─────────────────────────────────────────────────────┐
//! └──────┬───────┘                                                      ▼
//!        │ add_edge / detect_deadlock / is_safe              ┌────────────────┐
//!        ▼                                                   │ MutualExclusion│
//! ┌──────────────┐                                           └────────────────┘
//! │    oracle    │
//! └──────────────┘
//! ```
//!
//! A typical allocator records `requester -> holder` in the wait-for graph
//! when `try_acquire` fails, asks for a deadlock verdict, and only then
//! blocks in `acquire` or `acquire_with_timeout`.

use std::time::Duration;

/// Lock capability consumed by allocators that consult the oracle
///
/// # Design Contract
///
/// 1. **Exclusivity**: at most one successful acquisition is outstanding
/// 2. **Non-blocking attempt**: `try_acquire` never parks the caller
/// 3. **Bounded wait**: `acquire_with_timeout` returns `false` once the
///    budget is spent without the lock
/// 4. **Owned release**: only the holder can release; releasing a lock that
///    is not held, or that another thread holds, has no effect
pub trait MutualExclusion: Send + Sync {
    /// Acquire without blocking; `true` on success
    fn try_acquire(&self) -> bool;

    /// Block until acquired
    fn acquire(&self);

    /// Block for at most `timeout`; `true` if acquired
    fn acquire_with_timeout(&self, timeout: Duration) -> bool;

    /// Give the lock back
    fn release(&self);
}

impl<L: MutualExclusion + ?Sized> MutualExclusion for std::sync::Arc<L> {
    #[inline]
    fn try_acquire(&self) -> bool {
        (**self).try_acquire()
    }

    #[inline]
    fn acquire(&self) {
        (**self).acquire();
    }

    #[inline]
    fn acquire_with_timeout(&self, timeout: Duration) -> bool {
        (**self).acquire_with_timeout(timeout)
    }

    #[inline]
    fn release(&self) {
        (**self).release();
    }
}
