//! Code-assist prompts and fenced-block extraction

use super::formatter::TaskFormatter;
use super::template;
use crate::core::task::{Mode, Task};
use crate::orchestration::role::AgentRole;

const FENCE: &str = "```";

/// Return the body of the first fenced code block in `text`.
///
/// The opening fence may carry a language tag on its line; the body starts on
/// the following line and runs up to the next fence. Returns `None` when there
/// is no complete block.
pub fn find_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find(FENCE)?;
    Some(&body[..close])
}

/// Code from the judge output: the first fenced block, or the raw output
/// verbatim when there is none.
pub fn extract_code(judge_output: &str) -> String {
    find_fenced_block(judge_output)
        .unwrap_or(judge_output)
        .to_string()
}

/// Formatter for the code-fix, code-explain and code-generate modes
pub struct CodeFormatter {
    mode: Mode,
}

impl CodeFormatter {
    pub fn new(mode: Mode) -> Self {
        debug_assert!(mode.is_code());
        Self { mode }
    }

    fn language(task: &Task) -> &str {
        task.language().unwrap_or("the language used in the task")
    }

    fn returns_code(&self) -> bool {
        matches!(self.mode, Mode::CodeFix | Mode::CodeGenerate)
    }
}

impl TaskFormatter for CodeFormatter {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn agent_prompt(&self, role: AgentRole, task: &Task) -> String {
        let language = Self::language(task);
        let body = match self.mode {
            Mode::CodeFix => format!(
                "Find and fix the bugs in the following {} code. \
                 Return the corrected code in a single fenced code block, then list the fixes briefly.",
                language
            ),
            Mode::CodeExplain => format!(
                "Explain what the following {} code does, step by step, \
                 including inputs, outputs and any pitfalls.",
                language
            ),
            _ => format!(
                "Write {} code that accomplishes the following. \
                 Return the code in a single fenced code block.",
                language
            ),
        };
        template::agent_prompt(role, &body, task)
    }

    fn judge_instruction(&self, task: &Task) -> String {
        if self.returns_code() {
            format!(
                "Produce the best final {} code by combining the correct parts of the answers. \
                 Return only the final code block, fenced with ``` and nothing else.",
                Self::language(task)
            )
        } else {
            "Provide a detailed explanation of the code that merges the agents' correct insights."
                .to_string()
        }
    }

    fn post_process(&self, judge_output: &str) -> Option<String> {
        self.returns_code().then(|| extract_code(judge_output))
    }
}
