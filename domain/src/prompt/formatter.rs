//! Mode-specific prompt strategy

use super::template;
use super::{chat, code, dataset, qc, sequence};
use crate::core::task::{Mode, Task};
use crate::orchestration::role::{AgentRole, LOCAL_VERIFIER_FALLBACK};
use crate::orchestration::value_objects::AgentResult;

/// Turns a task into per-role prompts and a judge prompt for one [`Mode`].
///
/// The orchestrator is generic over this trait, so every mode shares the same
/// fan-out, failure handling and judge flow.
pub trait TaskFormatter: Send + Sync {
    fn mode(&self) -> Mode;

    /// Prompt for a non-judge role
    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String;

    /// Mode-specific instruction appended to the judge prompt
    fn judge_instruction(&self, task: &Task) -> String;

    fn judge_prompt(&self, task: &Task, results: &[AgentResult]) -> String {
        template::judge_prompt(task, results, &self.judge_instruction(task))
    }

    /// Structured artifact extracted from the judge output, if the mode has one
    fn post_process(&self, _judge_output: &str) -> Option<String> {
        None
    }

    /// Text the local verifier contributes when the local engine is not ready
    fn local_fallback(&self) -> &str {
        LOCAL_VERIFIER_FALLBACK
    }
}

/// Select the formatter for a mode
pub fn formatter_for(mode: Mode) -> Box<dyn TaskFormatter> {
    match mode {
        Mode::Chat => Box::new(chat::ChatFormatter),
        Mode::CodeFix | Mode::CodeExplain | Mode::CodeGenerate => {
            Box::new(code::CodeFormatter::new(mode))
        }
        Mode::SequenceAnalysis => Box::new(sequence::SequenceFormatter),
        Mode::DatasetSearch => Box::new(dataset::DatasetFormatter),
        Mode::QcVerification => Box::new(qc::QcFormatter),
    }
}
