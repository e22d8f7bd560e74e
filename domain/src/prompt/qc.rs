//! Quality-control verification prompts

use super::formatter::TaskFormatter;
use super::template;
use crate::core::task::{Mode, Task};
use crate::orchestration::role::AgentRole;

pub struct QcFormatter;

impl TaskFormatter for QcFormatter {
    fn mode(&self) -> Mode {
        Mode::QcVerification
    }

    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String {
        let body = "Review the quality-control metrics or report in the task \
                    (e.g. FastQC, MultiQC, alignment or assay QC). For each check give a verdict of \
                    PASS, WARN or FAIL with the threshold you applied and a short justification.";
        template::agent_prompt(role, body, task)
    }

    fn judge_instruction(&self, _task: &Task) -> String {
        "Produce the final QC verdict: a markdown table with one row per check \
         (check, verdict PASS/WARN/FAIL, evidence), followed by an overall verdict \
         and recommended actions for every WARN or FAIL."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qc_prompts_request_verdicts() {
        let task = Task::new("per-base quality drops below 20 after cycle 120", Mode::QcVerification)
            .unwrap();
        assert!(QcFormatter.agent_prompt(AgentRole::PrimaryFast, &task).contains("PASS, WARN or FAIL"));
        assert!(QcFormatter.judge_instruction(&task).contains("overall verdict"));
    }
}
