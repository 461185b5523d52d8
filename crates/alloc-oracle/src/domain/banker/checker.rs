//! SafetyChecker - Banker's Algorithm
//!
//! # Safety Check
//!
//! ```text
//! work   := available
//! finish := [false; n]
//! repeat
//!     for each unfinished i with need[i] <= work (every kind):
//!         work   += allocation[i]      // i runs to completion, releases all
//!         finish[i] = true
//! until a full pass finishes nobody
//! safe  <=> every finish[i]
//! ```
//!
//! The checker is a stateless unit struct: each call works on borrowed input
//! and its own scratch vectors, so it is reentrant and needs no
//! synchronization. Allocators re-ask it for every hypothetical grant.

use tracing::debug;

use super::matrix::Matrix;
use super::state::{validate_shapes, AllocationState};
use crate::error::OracleResult;

/// Outcome of a full safety evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyReport {
    /// Processes in the order they were able to finish
    pub sequence: Vec<usize>,
    /// Processes whose need can never be met; empty iff safe
    pub stuck: Vec<usize>,
}

impl SafetyReport {
    /// True if every process can finish
    #[inline]
    pub fn is_safe(&self) -> bool {
        self.stuck.is_empty()
    }
}

/// Answer to "may process P be granted this request now?"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantDecision {
    /// Granting keeps the system safe; carries the post-grant state
    Grant(AllocationState),
    /// Not enough free units of `resource` right now; the process must wait
    MustWait {
        /// First resource kind that is short
        resource: usize,
        /// Units requested of that kind
        requested: u64,
        /// Units currently free of that kind
        available: u64,
    },
    /// The units exist, but granting them would leave the system unsafe
    Unsafe {
        /// Processes that could no longer finish after the grant
        stuck: Vec<usize>,
    },
}

impl GrantDecision {
    /// True for [`GrantDecision::Grant`]
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Grant(_))
    }
}

/// Banker's Algorithm safety oracle
pub struct SafetyChecker;

impl SafetyChecker {
    /// Decide whether the given allocation state is safe
    ///
    /// `need` is taken as supplied (not recomputed from `max_demand`);
    /// `max_demand` only takes part in shape validation.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the inputs disagree on `n` or `m`. The check
    /// never panics and never truncates on malformed shapes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloc_oracle::{Matrix, SafetyChecker};
    ///
    /// let max = Matrix::from_rows(vec![vec![2, 1], vec![1, 1]]).unwrap();
    /// let alloc = Matrix::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
    /// let need = max.checked_sub(&alloc).unwrap();
    ///
    /// assert!(SafetyChecker::is_safe(&[1, 0], &max, &alloc, &need).unwrap());
    /// assert!(!SafetyChecker::is_safe(&[0, 0], &max, &alloc, &need).unwrap());
    /// ```
    pub fn is_safe(
        available: &[u64],
        max_demand: &Matrix,
        allocation: &Matrix,
        need: &Matrix,
    ) -> OracleResult<bool> {
        validate_shapes(available, max_demand, allocation, need)?;
        Ok(run(available, allocation, need).is_safe())
    }

    /// Full evaluation of a validated state
    pub fn check(state: &AllocationState) -> SafetyReport {
        run(state.available(), state.allocation(), state.need())
    }

    /// A completion order witnessing safety, or `None` if unsafe
    pub fn safe_sequence(state: &AllocationState) -> Option<Vec<usize>> {
        let report = Self::check(state);
        report.is_safe().then_some(report.sequence)
    }

    /// Banker's resource-request algorithm
    ///
    /// 1. The request must not exceed the process's remaining need
    ///    (contract violation otherwise).
    /// 2. If any kind lacks free units, the process must wait.
    /// 3. Otherwise pretend to grant and keep the grant only if the
    ///    resulting state is safe.
    ///
    /// # Errors
    ///
    /// `InvalidProcess`, `DimensionMismatch` or `RequestExceedsNeed`.
    pub fn evaluate_request(
        state: &AllocationState,
        process: usize,
        request: &[u64],
    ) -> OracleResult<GrantDecision> {
        state.check_request(process, request)?;

        let short = request
            .iter()
            .zip(state.available())
            .enumerate()
            .find(|&(_, (&requested, &available))| requested > available);
        if let Some((resource, (&requested, &available))) = short {
            debug!(process, resource, requested, available, "request must wait");
            return Ok(GrantDecision::MustWait {
                resource,
                requested,
                available,
            });
        }

        let candidate = state.with_grant(process, request)?;
        let report = Self::check(&candidate);
        if report.is_safe() {
            debug!(process, ?request, "request granted");
            Ok(GrantDecision::Grant(candidate))
        } else {
            debug!(process, ?request, stuck = ?report.stuck, "request refused: unsafe");
            Ok(GrantDecision::Unsafe {
                stuck: report.stuck,
            })
        }
    }
}

/// Fixed-point safety scan; shapes already validated
fn run(available: &[u64], allocation: &Matrix, need: &Matrix) -> SafetyReport {
    let processes = need.rows();
    let mut work = available.to_vec();
    let mut finished = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);

    loop {
        let mut progressed = false;

        for i in 0..processes {
            if finished[i] {
                continue;
            }
            let satisfiable = need.row(i).iter().zip(&work).all(|(n, w)| n <= w);
            if satisfiable {
                for (w, &held) in work.iter_mut().zip(allocation.row(i)) {
                    *w = w.saturating_add(held);
                }
                finished[i] = true;
                sequence.push(i);
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    let stuck: Vec<usize> = (0..processes).filter(|&i| !finished[i]).collect();
    debug!(processes, safe = stuck.is_empty(), ?sequence, "safety check complete");

    SafetyReport { sequence, stuck }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;

    fn matrix(rows: Vec<Vec<u64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn textbook() -> AllocationState {
        AllocationState::from_demand(
            vec![3, 3, 2],
            matrix(vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ]),
            matrix(vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_textbook_sequence() {
        let report = SafetyChecker::check(&textbook());
        assert!(report.is_safe());
        assert_eq!(report.sequence, vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_zero_need_finishes_immediately() {
        let state = AllocationState::from_demand(
            vec![0],
            matrix(vec![vec![2]]),
            matrix(vec![vec![2]]),
        )
        .unwrap();
        assert_eq!(SafetyChecker::safe_sequence(&state), Some(vec![0]));
    }

    #[test]
    fn test_zero_available_blocks_until_release() {
        // P1 needs one unit of kind 0, which only P0 can release.
        let state = AllocationState::from_demand(
            vec![0, 1],
            matrix(vec![vec![1, 1], vec![1, 0]]),
            matrix(vec![vec![1, 0], vec![0, 0]]),
        )
        .unwrap();
        assert_eq!(SafetyChecker::safe_sequence(&state), Some(vec![0, 1]));
    }

    #[test]
    fn test_stuck_processes_reported() {
        let state = AllocationState::from_demand(
            vec![0],
            matrix(vec![vec![1], vec![2], vec![0]]),
            matrix(vec![vec![0], vec![1], vec![0]]),
        )
        .unwrap();
        let report = SafetyChecker::check(&state);
        assert!(!report.is_safe());
        assert_eq!(report.sequence, vec![2]);
        assert_eq!(report.stuck, vec![0, 1]);
    }

    #[test]
    fn test_is_safe_rejects_mismatched_need() {
        let max = matrix(vec![vec![1, 1], vec![1, 1]]);
        let alloc = matrix(vec![vec![0, 0], vec![0, 0]]);
        let need = matrix(vec![vec![1, 1, 1], vec![1, 1, 1]]);
        assert_eq!(
            SafetyChecker::is_safe(&[1, 1], &max, &alloc, &need),
            Err(OracleError::DimensionMismatch {
                what: "need columns",
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_is_safe_rejects_short_available() {
        let max = matrix(vec![vec![1, 1]]);
        assert!(matches!(
            SafetyChecker::is_safe(&[1], &max, &max, &Matrix::zeros(1, 2)),
            Err(OracleError::DimensionMismatch { what: "max_demand columns", .. })
        ));
    }

    #[test]
    fn test_evaluate_request_textbook_walkthrough() {
        let state = textbook();

        // P1 asks for (1, 0, 2): safe, granted
        let after_p1 = match SafetyChecker::evaluate_request(&state, 1, &[1, 0, 2]).unwrap() {
            GrantDecision::Grant(next) => next,
            other => panic!("expected grant, got {other:?}"),
        };
        assert_eq!(after_p1.available(), &[2, 3, 0]);

        // P4 asks for (3, 3, 0): not enough of kind 0
        assert_eq!(
            SafetyChecker::evaluate_request(&after_p1, 4, &[3, 3, 0]).unwrap(),
            GrantDecision::MustWait {
                resource: 0,
                requested: 3,
                available: 2
            }
        );

        // P0 asks for (0, 2, 0): units exist but the result is unsafe
        let decision = SafetyChecker::evaluate_request(&after_p1, 0, &[0, 2, 0]).unwrap();
        assert!(matches!(decision, GrantDecision::Unsafe { ref stuck } if stuck.len() == 5));
        assert!(!decision.is_granted());
    }

    #[test]
    fn test_evaluate_request_beyond_need() {
        let result = SafetyChecker::evaluate_request(&textbook(), 1, &[2, 0, 0]);
        assert!(matches!(
            result,
            Err(OracleError::RequestExceedsNeed { process: 1, resource: 0, requested: 2, need: 1 })
        ));
    }
}
