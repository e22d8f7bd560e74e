//! Consensus parameters: run-level behavior switches.
//!
//! [`ConsensusParams`] groups the static parameters that control
//! [`RunConsensusUseCase`](crate::use_cases::run_consensus::RunConsensusUseCase).
//! These are application-layer concerns, not domain policy.

use helix_domain::JudgeFailurePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// What to do when the judge call fails
    pub judge_failure: JudgeFailurePolicy,
    /// Let the local verifier call the local engine when it is ready.
    ///
    /// When false the role still participates with its fallback text.
    pub include_local: bool,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            judge_failure: JudgeFailurePolicy::Strict,
            include_local: true,
        }
    }
}

impl ConsensusParams {
    // ==================== Builder Methods ====================

    pub fn with_judge_failure(mut self, policy: JudgeFailurePolicy) -> Self {
        self.judge_failure = policy;
        self
    }

    pub fn with_include_local(mut self, include: bool) -> Self {
        self.include_local = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ConsensusParams::default();
        assert_eq!(params.judge_failure, JudgeFailurePolicy::Strict);
        assert!(params.include_local);
    }

    #[test]
    fn test_builder() {
        let params = ConsensusParams::default()
            .with_judge_failure(JudgeFailurePolicy::BestAgent)
            .with_include_local(false);

        assert_eq!(params.judge_failure, JudgeFailurePolicy::BestAgent);
        assert!(!params.include_local);
    }
}
