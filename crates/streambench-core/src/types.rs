//! Shared value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub u64);

impl EndpointId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for EndpointId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text received so far from one endpoint, split by category.
///
/// Both fields only ever grow during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseText {
    pub reasoning: String,
    pub content: String,
}

impl ResponseText {
    /// Response shown for an endpoint that failed: no reasoning, the error as content
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            reasoning: String::new(),
            content: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reasoning.is_empty() && self.content.is_empty()
    }
}
