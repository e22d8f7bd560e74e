//! Sequence-analysis prompts

use super::formatter::TaskFormatter;
use super::template;
use crate::bio::sequence::SequenceStats;
use crate::core::task::{Mode, Task};
use crate::orchestration::role::AgentRole;

pub struct SequenceFormatter;

impl SequenceFormatter {
    fn stats_line(task: &Task) -> String {
        match SequenceStats::from_task_text(task.content()) {
            Some(stats) => format!("Precomputed statistics: {}.", stats.summary()),
            None => "No sequence could be parsed from the task; work from the description.".to_string(),
        }
    }
}

impl TaskFormatter for SequenceFormatter {
    fn mode(&self) -> Mode {
        Mode::SequenceAnalysis
    }

    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String {
        let focus = match role {
            AgentRole::DeepResearch => {
                "Identify likely gene, organism or protein family, known motifs and domains, \
                 and relevant literature or database entries."
            }
            AgentRole::LocalVerifier => {
                "Check the precomputed statistics against the sequence and flag anything implausible."
            }
            _ => "Give a concise biological interpretation of the sequence.",
        };
        let body = format!(
            "Analyze the nucleotide or protein sequence in the task. {}\n{}",
            focus,
            Self::stats_line(task)
        );
        template::agent_prompt(role, &body, task)
    }

    fn judge_instruction(&self, task: &Task) -> String {
        format!(
            "Write the final sequence analysis: composition, likely identity, notable features \
             and suggested follow-up analyses. Keep the precomputed numbers exact.\n{}",
            Self::stats_line(task)
        )
    }
}
