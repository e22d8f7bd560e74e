//! Consensus configuration from TOML (`[consensus]` section)

use helix_domain::JudgeFailurePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// `"strict"` or `"best_agent"`
    pub judge_failure: JudgeFailurePolicy,
}
