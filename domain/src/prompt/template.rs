//! Shared prompt building blocks used by every mode formatter

use crate::core::task::Task;
use crate::orchestration::role::AgentRole;
use crate::orchestration::value_objects::AgentResult;

/// Role-specific framing prepended to every non-judge prompt
pub fn role_framing(role: AgentRole) -> &'static str {
    match role {
        AgentRole::PrimaryFast => {
            r#"You are the primary assistant in a panel of AI agents.
Answer quickly and directly. Prefer a clear, correct answer over an exhaustive one."#
        }
        AgentRole::DeepResearch => {
            r#"You are the deep-research agent in a panel of AI agents.
Investigate thoroughly. Consult external sources where available and cite them.
Call out uncertainty, caveats and conflicting evidence explicitly."#
        }
        AgentRole::LocalVerifier => {
            r#"You are the verification agent in a panel of AI agents.
Work independently and check for factual or logical errors.
Keep the answer short and state clearly what you could and could not verify."#
        }
        AgentRole::Judge => {
            r#"You are the judge of a panel of AI agents.
Several agents answered the same task independently. Some sections may be
placeholders for agents that failed; ignore those.
Reconcile the answers: keep what is correct and well supported, resolve
disagreements on the merits, and discard errors."#
        }
    }
}

/// Assemble a non-judge prompt: role framing, mode body, task.
pub fn agent_prompt(role: AgentRole, mode_body: &str, task: &Task) -> String {
    format!(
        r#"{}

{}

Task:
{}"#,
        role_framing(role),
        mode_body,
        task.content()
    )
}

/// Assemble the judge prompt.
///
/// Embeds the task verbatim and every result under its role label, in the
/// order given (callers pass [`AgentRole::FAN_OUT`] order), followed by the
/// mode-specific instruction.
pub fn judge_prompt(task: &Task, results: &[AgentResult], instruction: &str) -> String {
    let mut prompt = format!(
        r#"{}

Original task ({}):
{}

Agent answers:
"#,
        role_framing(AgentRole::Judge),
        task.mode(),
        task.content()
    );

    for result in results {
        prompt.push_str(&format!("\n--- {} ---\n{}\n", result.role.label(), result.text));
    }

    prompt.push('\n');
    prompt.push_str(instruction);
    prompt
}
