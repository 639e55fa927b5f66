//! Per-endpoint status state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an endpoint is in its run.
///
/// Moves strictly forward: `idle -> waiting -> streaming -> done | error`.
/// `done` and `error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    /// Not part of the current run
    #[default]
    Idle,
    /// Request issued, nothing received yet
    Waiting,
    /// At least one non-empty delta received
    Streaming,
    Done,
    Error,
}

impl EndpointStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    fn stage(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Waiting => 1,
            Self::Streaming => 2,
            Self::Done | Self::Error => 3,
        }
    }

    /// Whether an update carrying `next` may replace one carrying `self`.
    ///
    /// `streaming -> streaming` is allowed since every delta republishes.
    /// Nothing leaves a terminal status.
    pub fn can_transition_to(&self, next: EndpointStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (Self::Streaming, Self::Streaming) => true,
            _ => next.stage() > self.stage(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Waiting => "waiting",
            Self::Streaming => "streaming",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
