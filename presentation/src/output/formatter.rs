//! Output formatter trait

use helix_domain::{ConsensusOutcome, OutputFormat};

/// Trait for rendering consensus outcomes
pub trait OutputFormatter {
    /// Every agent's answer followed by the final answer
    fn format_full(&self, outcome: &ConsensusOutcome) -> String;

    /// The outcome as pretty-printed JSON
    fn format_json(&self, outcome: &ConsensusOutcome) -> String;

    /// Only the final answer (or the failure)
    fn format_final(&self, outcome: &ConsensusOutcome) -> String;

    fn render(&self, outcome: &ConsensusOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Final => self.format_final(outcome),
            OutputFormat::Full => self.format_full(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
