//! ParkingLock - `MutualExclusion` over `parking_lot::RawMutex`
//!
//! A guard-less lock: acquisition and release are separate calls, which is
//! the shape allocators need when the holder is tracked externally (e.g. as
//! an edge in the wait-for graph) rather than by a scoped guard.
//!
//! # Ownership
//!
//! `RawMutex::unlock` may only run on the thread that locked the mutex. The
//! acquiring thread's `ThreadId` is recorded next to the raw mutex, and
//! `release` unlocks only when called from that thread. A release from any
//! other thread, or of a lock nobody holds, does nothing. The lock is not
//! reentrant: a second `acquire` on the owning thread blocks forever.

use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::lock_api::{RawMutex as _, RawMutexTimed as _};
use parking_lot::{Mutex, RawMutex};
use tracing::trace;

use crate::domain::lock::MutualExclusion;

/// Guard-less mutex backed by `parking_lot`
pub struct ParkingLock {
    raw: RawMutex,
    owner: Mutex<Option<ThreadId>>,
}

impl ParkingLock {
    /// Create an unlocked lock
    pub fn new() -> Self {
        Self {
            raw: RawMutex::INIT,
            owner: Mutex::new(None),
        }
    }

    /// True while some thread holds the lock
    #[inline]
    pub fn is_held(&self) -> bool {
        self.owner.lock().is_some()
    }

    /// True if the calling thread holds the lock
    #[inline]
    pub fn is_held_by_current_thread(&self) -> bool {
        *self.owner.lock() == Some(thread::current().id())
    }

    #[inline]
    fn claim(&self) {
        *self.owner.lock() = Some(thread::current().id());
    }
}

impl Default for ParkingLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParkingLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParkingLock")
            .field("owner", &*self.owner.lock())
            .finish()
    }
}

impl MutualExclusion for ParkingLock {
    fn try_acquire(&self) -> bool {
        let acquired = self.raw.try_lock();
        if acquired {
            self.claim();
        }
        acquired
    }

    fn acquire(&self) {
        self.raw.lock();
        self.claim();
    }

    fn acquire_with_timeout(&self, timeout: Duration) -> bool {
        let acquired = self.raw.try_lock_for(timeout);
        if acquired {
            self.claim();
        } else {
            trace!(timeout_ms = timeout.as_millis() as u64, "lock wait timed out");
        }
        acquired
    }

    fn release(&self) {
        let caller = thread::current().id();
        let mut owner = self.owner.lock();
        if *owner != Some(caller) {
            trace!(?caller, owner = ?*owner, "release by non-owner ignored");
            return;
        }
        *owner = None;
        // SAFETY: the owner slot named the calling thread, so this thread
        // locked `raw` and has not unlocked it since.
        unsafe { self.raw.unlock() };
    }
}
