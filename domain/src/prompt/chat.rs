//! Chat mode prompts

use super::formatter::TaskFormatter;
use super::template;
use crate::core::string::clip_to_bytes;
use crate::core::task::{Mode, Task};
use crate::orchestration::role::AgentRole;

/// Earlier turns rendered into the prompt
const HISTORY_TURNS: usize = 6;
/// Per-message cap for rendered history
const HISTORY_MESSAGE_BYTES: usize = 1200;

pub struct ChatFormatter;

impl ChatFormatter {
    fn history_block(task: &Task) -> Option<String> {
        let history = task.history();
        if history.is_empty() {
            return None;
        }

        let skip = history.len().saturating_sub(HISTORY_TURNS);
        let mut block = String::from("Conversation so far:\n");
        for turn in &history[skip..] {
            block.push_str(&format!(
                "User: {}\nAssistant: {}\n",
                clip_to_bytes(&turn.user, HISTORY_MESSAGE_BYTES),
                clip_to_bytes(&turn.assistant, HISTORY_MESSAGE_BYTES)
            ));
        }
        Some(block)
    }
}

impl TaskFormatter for ChatFormatter {
    fn mode(&self) -> Mode {
        Mode::Chat
    }

    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String {
        let mut body = String::from(
            "You assist researchers in a molecular biology and bioinformatics workspace. \
             Answer the user's latest message.",
        );
        if let Some(history) = Self::history_block(task) {
            body.push_str("\n\n");
            body.push_str(&history);
        }
        template::agent_prompt(role, &body, task)
    }

    fn judge_instruction(&self, _task: &Task) -> String {
        "Write the single best reply to the user. Provide a detailed explanation where it helps, \
         use markdown, and do not mention the individual agents."
            .to_string()
    }
}
