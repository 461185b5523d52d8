//! # Oracle Configuration
//!
//! Tunables for graph pre-sizing and the channel-driven graph service.
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// Default number of node slots reserved up front
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Default depth of the service request queue
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default wall-clock budget for bounded detection
pub const DEFAULT_DETECTION_TIMEOUT_MS: u64 = 1_000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Graph sizing
    pub graph: GraphConfig,
    /// Graph service behaviour
    pub service: ServiceConfig,
}

/// Graph sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node slots reserved when the graph is created
    pub initial_capacity: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Graph service behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bounded request queue depth
    pub channel_capacity: usize,
    /// Budget for `detect_deadlock_within` when the caller passes none
    pub detection_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            detection_timeout_ms: DEFAULT_DETECTION_TIMEOUT_MS,
        }
    }
}

impl OracleConfig {
    /// Parse and validate a JSON document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the document is not valid JSON for this shape or
    /// fails [`OracleConfig::validate`].
    pub fn from_json_str(json: &str) -> OracleResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| OracleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the channel capacity or detection timeout is zero.
    pub fn validate(&self) -> OracleResult<()> {
        if self.service.channel_capacity == 0 {
            return Err(OracleError::InvalidConfig(
                "service.channel_capacity must be greater than zero".into(),
            ));
        }
        if self.service.detection_timeout_ms == 0 {
            return Err(OracleError::InvalidConfig(
                "service.detection_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
