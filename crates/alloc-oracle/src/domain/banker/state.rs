//! Allocation State Snapshot
//!
//! The four Banker's inputs bundled behind a checked constructor:
//!
//! | Field        | Shape | Meaning                                   |
//! |--------------|-------|-------------------------------------------|
//! | `available`  | m     | units of each kind currently unallocated  |
//! | `max_demand` | n x m | most units process i may ever hold of j   |
//! | `allocation` | n x m | units of j process i holds now            |
//! | `need`       | n x m | `max_demand - allocation`                 |
//!
//! Shapes are validated once here. The semantic preconditions
//! (`allocation <= max_demand`, `need == max_demand - allocation`,
//! conservation of totals) are the caller's responsibility when `need` is
//! supplied directly; [`AllocationState::from_demand`] derives `need` and
//! therefore enforces the first two.

use serde::{Deserialize, Serialize};

use super::matrix::Matrix;
use crate::error::{OracleError, OracleResult};

/// Validated Banker's input snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllocationSnapshot", into = "AllocationSnapshot")]
pub struct AllocationState {
    available: Vec<u64>,
    max_demand: Matrix,
    allocation: Matrix,
    need: Matrix,
}

/// Wire form of [`AllocationState`]; `need` is derived when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    /// Units of each kind currently unallocated
    pub available: Vec<u64>,
    /// Declared maximum per process and kind
    pub max_demand: Matrix,
    /// Current holdings per process and kind
    pub allocation: Matrix,
    /// Remaining claim per process and kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need: Option<Matrix>,
}

/// Check that all inputs agree on `n` processes and `m` resource kinds
///
/// `n` comes from `max_demand`, `m` from `available`.
pub(crate) fn validate_shapes(
    available: &[u64],
    max_demand: &Matrix,
    allocation: &Matrix,
    need: &Matrix,
) -> OracleResult<()> {
    let processes = max_demand.rows();
    let kinds = available.len();

    for (matrix, rows_what, cols_what) in [
        (max_demand, "max_demand rows", "max_demand columns"),
        (allocation, "allocation rows", "allocation columns"),
        (need, "need rows", "need columns"),
    ] {
        if matrix.rows() != processes {
            return Err(OracleError::DimensionMismatch {
                what: rows_what,
                expected: processes,
                actual: matrix.rows(),
            });
        }
        if !matrix.has_shape(processes, kinds) {
            return Err(OracleError::DimensionMismatch {
                what: cols_what,
                expected: kinds,
                actual: matrix.cols(),
            });
        }
    }
    Ok(())
}

impl AllocationState {
    /// Bundle caller-supplied matrices after checking their shapes
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` naming the first inconsistent input.
    pub fn new(
        available: Vec<u64>,
        max_demand: Matrix,
        allocation: Matrix,
        need: Matrix,
    ) -> OracleResult<Self> {
        validate_shapes(&available, &max_demand, &allocation, &need)?;
        Ok(Self {
            available,
            max_demand,
            allocation,
            need,
        })
    }

    /// Bundle inputs, deriving `need = max_demand - allocation`
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if shapes disagree
    /// - `AllocationExceedsDemand` if any process holds more than its maximum
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloc_oracle::{AllocationState, Matrix};
    ///
    /// let state = AllocationState::from_demand(
    ///     vec![3, 3, 2],
    ///     Matrix::from_rows(vec![vec![7, 5, 3], vec![3, 2, 2]]).unwrap(),
    ///     Matrix::from_rows(vec![vec![0, 1, 0], vec![2, 0, 0]]).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(state.need().row(1), &[1, 2, 2]);
    /// ```
    pub fn from_demand(
        available: Vec<u64>,
        max_demand: Matrix,
        allocation: Matrix,
    ) -> OracleResult<Self> {
        let need = max_demand.checked_sub(&allocation)?;
        Self::new(available, max_demand, allocation, need)
    }

    /// Units of each kind currently unallocated
    #[inline]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Declared maxima
    #[inline]
    pub fn max_demand(&self) -> &Matrix {
        &self.max_demand
    }

    /// Current holdings
    #[inline]
    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    /// Remaining claims
    #[inline]
    pub fn need(&self) -> &Matrix {
        &self.need
    }

    /// Number of processes (`n`)
    #[inline]
    pub fn processes(&self) -> usize {
        self.max_demand.rows()
    }

    /// Number of resource kinds (`m`)
    #[inline]
    pub fn resource_kinds(&self) -> usize {
        self.available.len()
    }

    /// Check `request` against the process's remaining claim
    ///
    /// # Errors
    ///
    /// `InvalidProcess`, `DimensionMismatch` (request length) or
    /// `RequestExceedsNeed`.
    pub(crate) fn check_request(&self, process: usize, request: &[u64]) -> OracleResult<()> {
        if process >= self.processes() {
            return Err(OracleError::InvalidProcess {
                process,
                processes: self.processes(),
            });
        }
        if request.len() != self.resource_kinds() {
            return Err(OracleError::DimensionMismatch {
                what: "request length",
                expected: self.resource_kinds(),
                actual: request.len(),
            });
        }
        for (resource, (&requested, &need)) in request.iter().zip(self.need.row(process)).enumerate()
        {
            if requested > need {
                return Err(OracleError::RequestExceedsNeed {
                    process,
                    resource,
                    requested,
                    need,
                });
            }
        }
        Ok(())
    }

    /// Hypothetical state after granting `request` to `process`
    ///
    /// Moves the requested units from `available` into the process's
    /// allocation and out of its need. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidProcess`, `DimensionMismatch`, `RequestExceedsNeed` as for
    ///   any request
    /// - `InsufficientAvailable` if a kind does not have enough free units
    pub fn with_grant(&self, process: usize, request: &[u64]) -> OracleResult<Self> {
        self.check_request(process, request)?;

        let mut next = self.clone();
        for (resource, &requested) in request.iter().enumerate() {
            let available = next.available[resource];
            next.available[resource] =
                available
                    .checked_sub(requested)
                    .ok_or(OracleError::InsufficientAvailable {
                        resource,
                        requested,
                        available,
                    })?;
        }
        for (held, &requested) in next.allocation.row_mut(process).iter_mut().zip(request) {
            *held = held.saturating_add(requested);
        }
        for (need, &requested) in next.need.row_mut(process).iter_mut().zip(request) {
            *need -= requested;
        }
        Ok(next)
    }
}

impl TryFrom<AllocationSnapshot> for AllocationState {
    type Error = OracleError;

    fn try_from(snapshot: AllocationSnapshot) -> OracleResult<Self> {
        match snapshot.need {
            Some(need) => Self::new(
                snapshot.available,
                snapshot.max_demand,
                snapshot.allocation,
                need,
            ),
            None => Self::from_demand(snapshot.available, snapshot.max_demand, snapshot.allocation),
        }
    }
}

impl From<AllocationState> for AllocationSnapshot {
    fn from(state: AllocationState) -> Self {
        Self {
            available: state.available,
            max_demand: state.max_demand,
            allocation: state.allocation,
            need: Some(state.need),
        }
    }
}
