//! Console output formatter for consensus outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use helix_domain::{AgentResult, ClassifiedError, ConsensusOutcome};

/// Formats consensus outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Every agent's answer, then the judge's final answer
    pub fn format_full(outcome: &ConsensusOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Helix Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Mode:".cyan().bold(),
            outcome.mode.display_name()
        ));
        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), outcome.task));

        output.push_str(&Self::section_header("Phase 1: Agent Answers"));
        for result in &outcome.agent_results {
            output.push_str(&Self::agent_section(result));
        }
        if let Some(summary) = Self::failure_summary(outcome) {
            output.push_str(&format!("\n{}\n", summary.red()));
        }

        output.push_str(&Self::section_header("Phase 2: Judge"));
        output.push('\n');
        output.push_str(&Self::format_final(outcome));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &ConsensusOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// The final answer, or the classified failure with its hint.
    ///
    /// For code-fix and code-generate the extracted code stands in for the
    /// judge's full text.
    pub fn format_final(outcome: &ConsensusOutcome) -> String {
        let mut output = String::new();

        if let Some(error) = &outcome.error {
            output.push_str(&Self::format_error(error));
            if let Some(role) = outcome.fallback_role {
                output.push_str(&format!(
                    "\n{}\n\n{}\n",
                    format!("Showing the {} answer instead:", role.label())
                        .yellow()
                        .bold(),
                    outcome.final_text
                ));
            }
            return output;
        }

        output.push_str(outcome.code.as_deref().unwrap_or(&outcome.final_text));
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    /// `[Kind] message` followed by the user hint
    pub fn format_error(error: &ClassifiedError) -> String {
        format!(
            "{} {}\n{}\n",
            format!("[{}]", error.kind).red().bold(),
            error.message,
            error.kind.user_hint().dimmed()
        )
    }

    /// `2 of 3 agents failed: primary_fast (RateLimit), ...`
    fn failure_summary(outcome: &ConsensusOutcome) -> Option<String> {
        let failed: Vec<String> = outcome
            .failed_results()
            .map(|r| {
                format!(
                    "{} ({})",
                    r.role,
                    r.error_kind.map(|k| k.as_str()).unwrap_or("failed")
                )
            })
            .collect();
        if failed.is_empty() {
            return None;
        }
        Some(format!(
            "{} of {} agents failed: {}",
            failed.len(),
            outcome.agent_results.len(),
            failed.join(", ")
        ))
    }

    fn agent_section(result: &AgentResult) -> String {
        let title = format!("── {} ──", result.role.label());
        let title = match (result.succeeded, result.degraded) {
            (true, false) => title.yellow().bold(),
            (true, true) => format!("{} (unavailable)", title).dimmed(),
            (false, _) => format!(
                "{} ({})",
                title,
                result.error_kind.map(|k| k.as_str()).unwrap_or("failed")
            )
            .red()
            .bold(),
        };
        format!("\n{}\n{}\n", title, result.text)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, outcome: &ConsensusOutcome) -> String {
        Self::format_full(outcome)
    }

    fn format_json(&self, outcome: &ConsensusOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_final(&self, outcome: &ConsensusOutcome) -> String {
        Self::format_final(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_domain::{AgentRole, ErrorKind, Mode, OutputFormat};

    fn results() -> Vec<AgentResult> {
        vec![
            AgentResult::failure(AgentRole::PrimaryFast, ErrorKind::RateLimit),
            AgentResult::success(AgentRole::DeepResearch, "researched"),
            AgentResult::degraded(AgentRole::LocalVerifier, "offline"),
        ]
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_final_prints_judge_text() {
        plain();
        let outcome = ConsensusOutcome::settled("q", Mode::Chat, "the answer", results());
        assert_eq!(ConsoleFormatter::format_final(&outcome), "the answer\n");
    }

    #[test]
    fn test_final_prefers_extracted_code() {
        plain();
        let outcome = ConsensusOutcome::settled(
            "fix",
            Mode::CodeFix,
            "```rust\nfn main() {}\n```",
            results(),
        )
        .with_code("fn main() {}\n");
        assert_eq!(ConsoleFormatter::format_final(&outcome), "fn main() {}\n");
    }

    #[test]
    fn test_final_shows_classified_error_and_hint() {
        plain();
        let outcome = ConsensusOutcome::judge_failed(
            "q",
            Mode::Chat,
            results(),
            ClassifiedError::new(ErrorKind::NetworkError, "network error: connection reset"),
        );
        let text = ConsoleFormatter::format_final(&outcome);
        assert!(text.starts_with("[NetworkError] network error: connection reset"));
        assert!(text.contains(ErrorKind::NetworkError.user_hint()));
    }

    #[test]
    fn test_final_shows_fallback_after_error() {
        plain();
        let research = AgentResult::success(AgentRole::DeepResearch, "researched");
        let outcome = ConsensusOutcome::judge_failed(
            "q",
            Mode::Chat,
            results(),
            ClassifiedError::new(ErrorKind::RateLimit, "HTTP 429: quota exceeded"),
        )
        .with_fallback(&research);
        let text = ConsoleFormatter::format_final(&outcome);
        assert!(text.contains("[RateLimit]"));
        assert!(text.contains("Deep Research Agent"));
        assert!(text.ends_with("researched\n"));
    }

    #[test]
    fn test_full_lists_every_role_in_order() {
        plain();
        let outcome = ConsensusOutcome::settled("q", Mode::Chat, "final", results());
        let text = ConsoleFormatter.render(&outcome, OutputFormat::Full);

        let primary = text.find("Primary Agent").unwrap();
        let research = text.find("Deep Research Agent").unwrap();
        let local = text.find("Local Verifier Agent").unwrap();
        assert!(primary < research && research < local);
        assert!(text.contains("(RateLimit)"));
        assert!(text.contains("(unavailable)"));
        assert!(text.contains("final"));
    }

    #[test]
    fn test_full_summarizes_failed_agents() {
        plain();
        let mut agents = results();
        agents[1] = AgentResult::failure(AgentRole::DeepResearch, ErrorKind::SafetyFilter);
        let outcome = ConsensusOutcome::settled("q", Mode::Chat, "final", agents);

        let text = ConsoleFormatter::format_full(&outcome);
        assert!(text.contains(
            "2 of 3 agents failed: primary_fast (RateLimit), deep_research (SafetyFilter)"
        ));

        let clean = ConsensusOutcome::settled(
            "q",
            Mode::Chat,
            "final",
            vec![AgentResult::success(AgentRole::PrimaryFast, "a")],
        );
        assert!(!ConsoleFormatter::format_full(&clean).contains("agents failed"));
    }

    #[test]
    fn test_json_round_trips_outcome() {
        let outcome = ConsensusOutcome::settled("q", Mode::QcVerification, "PASS", results());
        let json = ConsoleFormatter.render(&outcome, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "qc-verification");
        assert_eq!(value["overall_succeeded"], true);
        assert_eq!(value["agent_results"].as_array().unwrap().len(), 3);
    }
}
