//! What to do with a fan-out whose judge call failed

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior when the judge call fails.
///
/// Both policies leave the run unsuccessful and carry the judge's classified
/// error; they differ only in whether `final_text` stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeFailurePolicy {
    /// A judge failure invalidates the consensus: `final_text` is empty.
    #[default]
    Strict,
    /// Surface the first successful non-degraded agent answer, in role order.
    BestAgent,
}

impl fmt::Display for JudgeFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JudgeFailurePolicy::Strict => write!(f, "strict"),
            JudgeFailurePolicy::BestAgent => write!(f, "best_agent"),
        }
    }
}

impl std::str::FromStr for JudgeFailurePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(JudgeFailurePolicy::Strict),
            "best_agent" | "best" => Ok(JudgeFailurePolicy::BestAgent),
            _ => Err(DomainError::InvalidPolicy(s.to_string())),
        }
    }
}
