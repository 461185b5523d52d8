//! Domain Model: Timestamp-Ordering Conflict Policies
//!
//! Pure decision rules for the moment a request hits a resource that another
//! transaction already holds. Every transaction carries the timestamp it was
//! first started with (smaller = older) and keeps it across restarts, which
//! is what makes both schemes starvation-free.
//!
//! | Requester vs holder | Wait-Die          | Wound-Wait            |
//! |---------------------|-------------------|-----------------------|
//! | requester older     | requester waits   | holder is wounded     |
//! | requester younger   | requester dies    | requester waits       |
//!
//! Waits only ever go in one age direction, so neither scheme can build a
//! circular wait. Equal timestamps count as "requester is not older".

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Start timestamp of a transaction (smaller = older)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// True if `self` started strictly before `other`
    #[inline(always)]
    pub fn is_older_than(self, other: Self) -> bool {
        self < other
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ts{}", self.0)
    }
}

/// What happens to a conflicting request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Requester blocks until the holder releases
    Wait,
    /// Requester aborts and restarts later with the same timestamp
    Die,
    /// Holder is aborted (preempted) and the requester proceeds
    Wound,
}

impl Resolution {
    /// True if the requester blocks
    #[inline]
    pub fn requester_waits(self) -> bool {
        matches!(self, Self::Wait)
    }

    /// True if someone has to roll back
    #[inline]
    pub fn aborts_someone(self) -> bool {
        !self.requester_waits()
    }
}

/// Timestamp-ordering scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Non-preemptive: older waits, younger dies
    WaitDie,
    /// Preemptive: older wounds, younger waits
    WoundWait,
}

impl TimestampPolicy {
    /// Resolve a conflict between `requester` and the current `holder`
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloc_oracle::domain::policy::{Resolution, Timestamp, TimestampPolicy};
    ///
    /// let old = Timestamp(1);
    /// let young = Timestamp(2);
    ///
    /// assert_eq!(TimestampPolicy::WaitDie.resolve(old, young), Resolution::Wait);
    /// assert_eq!(TimestampPolicy::WaitDie.resolve(young, old), Resolution::Die);
    /// assert_eq!(TimestampPolicy::WoundWait.resolve(old, young), Resolution::Wound);
    /// assert_eq!(TimestampPolicy::WoundWait.resolve(young, old), Resolution::Wait);
    /// ```
    pub fn resolve(self, requester: Timestamp, holder: Timestamp) -> Resolution {
        let requester_older = requester.cmp(&holder) == Ordering::Less;

        match (self, requester_older) {
            (Self::WaitDie, true) => Resolution::Wait,
            (Self::WaitDie, false) => Resolution::Die,
            (Self::WoundWait, true) => Resolution::Wound,
            (Self::WoundWait, false) => Resolution::Wait,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::WaitDie => "wait-die",
            Self::WoundWait => "wound-wait",
        }
    }
}

impl fmt::Display for TimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_die() {
        let policy = TimestampPolicy::WaitDie;
        assert!(policy.resolve(Timestamp(1), Timestamp(2)).requester_waits());
        assert_eq!(policy.resolve(Timestamp(2), Timestamp(1)), Resolution::Die);
    }

    #[test]
    fn test_wound_wait() {
        let policy = TimestampPolicy::WoundWait;
        assert_eq!(policy.resolve(Timestamp(1), Timestamp(2)), Resolution::Wound);
        assert!(policy.resolve(Timestamp(2), Timestamp(1)).requester_waits());
    }

    #[test]
    fn test_equal_timestamps_not_older() {
        assert_eq!(
            TimestampPolicy::WaitDie.resolve(Timestamp(5), Timestamp(5)),
            Resolution::Die
        );
        assert_eq!(
            TimestampPolicy::WoundWait.resolve(Timestamp(5), Timestamp(5)),
            Resolution::Wait
        );
    }

    #[test]
    fn test_waits_only_one_direction() {
        // Under either policy, if a waits for b then b never waits for a.
        for policy in [TimestampPolicy::WaitDie, TimestampPolicy::WoundWait] {
            for a in 0..4_u64 {
                for b in 0..4_u64 {
                    let ab = policy.resolve(Timestamp(a), Timestamp(b)).requester_waits();
                    let ba = policy.resolve(Timestamp(b), Timestamp(a)).requester_waits();
                    assert!(!(ab && ba && a != b), "{policy}: {a} and {b} wait on each other");
                }
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimestampPolicy::WoundWait).unwrap();
        assert_eq!(json, "\"wound_wait\"");
        assert!(Resolution::Die.aborts_someone());
    }
}
