//! # Oracle Error Types
//!
//! Contract violations and operational failures surfaced by the oracle.
//!
//! Absence of a cycle or an unsafe allocation state are *answers*, not errors:
//! they are returned as plain booleans. Errors are reserved for malformed
//! input (wrong matrix shapes, requests beyond declared need) and for the
//! service adapter losing its owner task.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors produced by the allocation oracle
///
/// # Error Code Ranges
///
/// - 1000-1099: Shape / dimension violations (caller contract)
/// - 2000-2099: Allocation request violations (caller contract)
/// - 3000-3099: Configuration errors
/// - 4000-4099: Service adapter failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Shape Errors (1000-1099)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Two inputs disagree on the number of processes or resource kinds
    #[error("Dimension mismatch in {what}: expected {expected}, found {actual}")]
    DimensionMismatch {
        /// Which input (and axis) was inconsistent
        what: &'static str,
        /// Size implied by the other inputs
        expected: usize,
        /// Size actually supplied
        actual: usize,
    },

    /// A nested-row matrix has rows of differing length
    #[error("Ragged matrix: row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        /// Offending row index
        row: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        actual: usize,
    },

    /// Flat storage length does not equal `rows * cols`
    #[error("Flat matrix length mismatch: expected {expected} cells, found {actual}")]
    FlatLengthMismatch {
        /// `rows * cols`
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// `rows * cols` does not fit in memory
    #[error("Matrix of {rows} x {cols} cells is too large")]
    MatrixTooLarge {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Request Errors (2000-2099)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// A process holds more of a resource kind than it declared as maximum
    #[error("Process {process} holds more of resource {resource} than its declared maximum")]
    AllocationExceedsDemand {
        /// Process row
        process: usize,
        /// Resource column
        resource: usize,
    },

    /// Process index outside `0..processes`
    #[error("Invalid process {process}: state has {processes} processes")]
    InvalidProcess {
        /// Requested process index
        process: usize,
        /// Number of processes in the state
        processes: usize,
    },

    /// A request asks for more than the process may still claim
    #[error("Process {process} requested {requested} of resource {resource} but needs at most {need}")]
    RequestExceedsNeed {
        /// Requesting process
        process: usize,
        /// Resource column
        resource: usize,
        /// Units requested
        requested: u64,
        /// Units still claimable
        need: u64,
    },

    /// A hypothetical grant asks for more than is currently available
    #[error("Resource {resource}: requested {requested} but only {available} available")]
    InsufficientAvailable {
        /// Resource column
        resource: usize,
        /// Units requested
        requested: u64,
        /// Units currently unallocated
        available: u64,
    },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Configuration Errors (3000-3099)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Service Errors (4000-4099)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The graph service task has stopped
    #[error("Graph service is closed")]
    ServiceClosed,

    /// Detection did not answer within the wall-clock budget
    #[error("Deadlock detection timed out after {timeout_ms}ms")]
    DetectionTimeout {
        /// Budget that was exceeded
        timeout_ms: u64,
    },
}

impl OracleError {
    /// Numeric error code for logs and process exit reporting
    pub fn code(&self) -> u32 {
        match self {
            Self::DimensionMismatch { .. } => 1001,
            Self::RaggedMatrix { .. } => 1002,
            Self::FlatLengthMismatch { .. } => 1003,
            Self::MatrixTooLarge { .. } => 1004,

            Self::AllocationExceedsDemand { .. } => 2001,
            Self::InvalidProcess { .. } => 2002,
            Self::RequestExceedsNeed { .. } => 2003,
            Self::InsufficientAvailable { .. } => 2004,

            Self::InvalidConfig(_) => 3001,

            Self::ServiceClosed => 4001,
            Self::DetectionTimeout { .. } => 4002,
        }
    }

    /// Check if the error is the caller's fault (malformed input)
    ///
    /// Contract violations are never worth retrying: the same input will
    /// fail the same way.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. }
                | Self::RaggedMatrix { .. }
                | Self::FlatLengthMismatch { .. }
                | Self::MatrixTooLarge { .. }
                | Self::AllocationExceedsDemand { .. }
                | Self::InvalidProcess { .. }
                | Self::RequestExceedsNeed { .. }
                | Self::InsufficientAvailable { .. }
        )
    }
}

/// Oracle Result type for convenience
pub type OracleResult<T> = Result<T, OracleError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OracleError::DimensionMismatch { what: "need rows", expected: 2, actual: 3 }.code(),
            1001
        );
        assert_eq!(
            OracleError::RequestExceedsNeed { process: 0, resource: 1, requested: 4, need: 2 }
                .code(),
            2003
        );
        assert_eq!(OracleError::InvalidConfig("x".into()).code(), 3001);
        assert_eq!(OracleError::ServiceClosed.code(), 4001);
    }

    #[test]
    fn test_contract_violations() {
        assert!(OracleError::RaggedMatrix { row: 1, expected: 3, actual: 2 }
            .is_contract_violation());
        assert!(OracleError::InvalidProcess { process: 9, processes: 5 }
            .is_contract_violation());

        assert!(!OracleError::ServiceClosed.is_contract_violation());
        assert!(!OracleError::DetectionTimeout { timeout_ms: 10 }.is_contract_violation());
    }

    #[test]
    fn test_error_display() {
        let err = OracleError::DimensionMismatch {
            what: "available length",
            expected: 3,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("available length"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }
}
