//! Agent roles within a consensus run

use crate::core::error_kind::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text contributed by the local verifier when the local engine is not ready.
///
/// A missing local engine is a degraded participant, not a failure.
pub const LOCAL_VERIFIER_FALLBACK: &str =
    "Local verification was not performed: the on-device model is not loaded. \
     Weigh the remaining answers on their own merits.";

/// The framing/purpose a backend is assigned within one consensus run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentRole {
    /// Fast, direct first answer from the low-latency hosted model
    PrimaryFast,
    /// Thorough answer from the high-capability hosted model, with retrieval
    DeepResearch,
    /// Independent check from the on-device model
    LocalVerifier,
    /// Final synthesis over every other role's output
    Judge,
}

impl AgentRole {
    /// Non-judge roles in the fixed order their results are reported and
    /// embedded into the judge prompt.
    pub const FAN_OUT: [AgentRole; 3] = [
        AgentRole::PrimaryFast,
        AgentRole::DeepResearch,
        AgentRole::LocalVerifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::PrimaryFast => "primary_fast",
            AgentRole::DeepResearch => "deep_research",
            AgentRole::LocalVerifier => "local_verifier",
            AgentRole::Judge => "judge",
        }
    }

    /// Label used to mark this role's section in the judge prompt
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::PrimaryFast => "Primary Agent (fast answer)",
            AgentRole::DeepResearch => "Deep Research Agent",
            AgentRole::LocalVerifier => "Local Verifier Agent (on-device)",
            AgentRole::Judge => "Judge",
        }
    }

    pub fn is_judge(&self) -> bool {
        matches!(self, AgentRole::Judge)
    }

    /// Diagnostic text standing in for a failed role's output.
    ///
    /// Always non-empty, so prompt construction never interpolates a missing value.
    pub fn failure_placeholder(&self, kind: ErrorKind) -> String {
        format!(
            "[{} produced no answer: backend failed with {}. Do not rely on this section.]",
            self.label(),
            kind
        )
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
