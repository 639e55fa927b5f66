//! Run identity

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one invocation of the benchmark.
///
/// Every published update carries the epoch of the run that produced it, so
/// updates from a superseded run can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunEpoch(Uuid);

impl RunEpoch {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight hex digits, enough to tell runs apart in logs
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RunEpoch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
