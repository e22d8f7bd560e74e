//! Orchestration phases

use serde::{Deserialize, Serialize};

/// Phase of a consensus run.
///
/// A run moves Idle → FanOut → Judge → Settled; only the two active phases
/// are reported to progress listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every non-judge role is queried concurrently
    FanOut,
    /// The judge reconciles all role outputs
    Judge,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::FanOut => "fan_out",
            Phase::Judge => "judge",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::FanOut => "Consulting agents",
            Phase::Judge => "Judging",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
