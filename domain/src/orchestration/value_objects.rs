//! Orchestration value objects - immutable result types for consensus runs.
//!
//! - [`AgentResult`] - one non-judge role's contribution to a run
//! - [`ConsensusOutcome`] - the settled run handed back to the caller

use super::role::AgentRole;
use crate::core::error_kind::{ClassifiedError, ErrorKind};
use crate::core::task::Mode;
use serde::{Deserialize, Serialize};

/// Result of a single role in the fan-out phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResult {
    /// The role that produced this result
    pub role: AgentRole,
    /// Backend output, or a diagnostic placeholder when the backend failed
    pub text: String,
    /// Whether the backend call succeeded
    pub succeeded: bool,
    /// Classified failure, present exactly when `succeeded` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// The role stood in with static text because its backend is unavailable
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl AgentResult {
    /// Creates a successful result carrying the backend output.
    pub fn success(role: AgentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            succeeded: true,
            error_kind: None,
            degraded: false,
        }
    }

    /// Creates a failed result whose text is the role's diagnostic placeholder.
    pub fn failure(role: AgentRole, kind: ErrorKind) -> Self {
        Self {
            role,
            text: role.failure_placeholder(kind),
            succeeded: false,
            error_kind: Some(kind),
            degraded: false,
        }
    }

    /// Creates a degraded-but-valid result: no error, static stand-in text.
    pub fn degraded(role: AgentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            succeeded: true,
            error_kind: None,
            degraded: true,
        }
    }

    /// A genuine answer: succeeded and not a stand-in
    pub fn is_answer(&self) -> bool {
        self.succeeded && !self.degraded
    }
}

/// Complete result of a consensus run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    /// The original task text
    pub task: String,
    /// Mode the task was submitted under
    pub mode: Mode,
    /// Judge output; empty when the judge failed under the strict policy
    pub final_text: String,
    /// One result per non-judge role, in [`AgentRole::FAN_OUT`] order
    pub agent_results: Vec<AgentResult>,
    /// True only when the judge call succeeded
    pub overall_succeeded: bool,
    /// Classified judge failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassifiedError>,
    /// Code extracted from the judge output (code modes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Role whose answer stands in for a failed judge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_role: Option<AgentRole>,
}

impl ConsensusOutcome {
    /// Creates the outcome of a run whose judge succeeded.
    pub fn settled(
        task: impl Into<String>,
        mode: Mode,
        final_text: impl Into<String>,
        agent_results: Vec<AgentResult>,
    ) -> Self {
        Self {
            task: task.into(),
            mode,
            final_text: final_text.into(),
            agent_results,
            overall_succeeded: true,
            error: None,
            code: None,
            fallback_role: None,
        }
    }

    /// Creates the outcome of a run whose judge failed.
    pub fn judge_failed(
        task: impl Into<String>,
        mode: Mode,
        agent_results: Vec<AgentResult>,
        error: ClassifiedError,
    ) -> Self {
        Self {
            task: task.into(),
            mode,
            final_text: String::new(),
            agent_results,
            overall_succeeded: false,
            error: Some(error),
            code: None,
            fallback_role: None,
        }
    }

    /// Attach code extracted from the final text.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the empty final text with an agent's answer after a judge failure.
    pub fn with_fallback(mut self, result: &AgentResult) -> Self {
        self.final_text = result.text.clone();
        self.fallback_role = Some(result.role);
        self
    }

    /// Kind of the terminal failure, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Result for a specific role
    pub fn result_for(&self, role: AgentRole) -> Option<&AgentResult> {
        self.agent_results.iter().find(|r| r.role == role)
    }

    /// Returns an iterator over only the failed agent results.
    pub fn failed_results(&self) -> impl Iterator<Item = &AgentResult> {
        self.agent_results.iter().filter(|r| !r.succeeded)
    }
}
