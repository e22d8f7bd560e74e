//! Task value object and the mode it is submitted under

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The use case a task is submitted under.
///
/// Each mode owns its own prompt framing (see [`crate::prompt`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Free-form question answering
    #[default]
    Chat,
    /// Repair a code snippet
    CodeFix,
    /// Explain what a code snippet does
    CodeExplain,
    /// Generate code from a description
    CodeGenerate,
    /// Interpret a nucleotide or protein sequence
    SequenceAnalysis,
    /// Find public datasets matching a description
    DatasetSearch,
    /// Verify quality-control results
    QcVerification,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Chat,
        Mode::CodeFix,
        Mode::CodeExplain,
        Mode::CodeGenerate,
        Mode::SequenceAnalysis,
        Mode::DatasetSearch,
        Mode::QcVerification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::CodeFix => "code-fix",
            Mode::CodeExplain => "code-explain",
            Mode::CodeGenerate => "code-generate",
            Mode::SequenceAnalysis => "sequence-analysis",
            Mode::DatasetSearch => "dataset-search",
            Mode::QcVerification => "qc-verification",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Chat => "Chat",
            Mode::CodeFix => "Code Fix",
            Mode::CodeExplain => "Code Explain",
            Mode::CodeGenerate => "Code Generate",
            Mode::SequenceAnalysis => "Sequence Analysis",
            Mode::DatasetSearch => "Dataset Search",
            Mode::QcVerification => "QC Verification",
        }
    }

    /// Whether this mode belongs to the code-assist family
    pub fn is_code(&self) -> bool {
        matches!(self, Mode::CodeFix | Mode::CodeExplain | Mode::CodeGenerate)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "chat" => Ok(Mode::Chat),
            "code-fix" | "fix" => Ok(Mode::CodeFix),
            "code-explain" | "explain" => Ok(Mode::CodeExplain),
            "code-generate" | "generate" | "gen" => Ok(Mode::CodeGenerate),
            "sequence-analysis" | "sequence" | "seq" => Ok(Mode::SequenceAnalysis),
            "dataset-search" | "dataset" | "datasets" => Ok(Mode::DatasetSearch),
            "qc-verification" | "qc" => Ok(Mode::QcVerification),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

/// One earlier exchange of a chat session.
///
/// History lives only as long as the session that keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A task submitted for consensus (Value Object)
///
/// Immutable once constructed: the orchestrator only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTask")]
pub struct Task {
    content: String,
    mode: Mode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    history: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// Wire shape of [`Task`]; deserialization goes through [`Task::new`]
#[derive(Deserialize)]
struct RawTask {
    content: String,
    mode: Mode,
    #[serde(default)]
    history: Vec<ChatTurn>,
    language: Option<String>,
}

impl TryFrom<RawTask> for Task {
    type Error = DomainError;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        let task = Task::new(raw.content, raw.mode)?.with_history(raw.history);
        Ok(match raw.language {
            Some(language) => task.with_language(language),
            None => task,
        })
    }
}

impl Task {
    /// Create a new task, rejecting empty or whitespace-only content
    pub fn new(content: impl Into<String>, mode: Mode) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyTask);
        }
        Ok(Self {
            content,
            mode,
            history: Vec::new(),
            language: None,
        })
    }

    /// Attach earlier chat turns (rendered by the chat formatter only)
    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// Attach a programming language hint for code modes
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.language = Some(language);
        }
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("explain CRISPR", Mode::Chat).unwrap();
        assert_eq!(task.content(), "explain CRISPR");
        assert_eq!(task.mode(), Mode::Chat);
        assert!(task.history().is_empty());
    }

    #[test]
    fn test_empty_task_rejected() {
        assert_eq!(Task::new("", Mode::Chat), Err(DomainError::EmptyTask));
        assert_eq!(Task::new("  \n", Mode::CodeFix), Err(DomainError::EmptyTask));
    }

    #[test]
    fn test_blank_language_ignored() {
        let task = Task::new("fix me", Mode::CodeFix)
            .unwrap()
            .with_language("  ");
        assert_eq!(task.language(), None);

        let task = task.with_language("python");
        assert_eq!(task.language(), Some("python"));
    }

    #[test]
    fn test_deserialize_applies_constructor_rules() {
        let blank = serde_json::from_str::<Task>(r#"{"content":"  ","mode":"chat"}"#);
        assert!(blank.is_err());

        let task: Task = serde_json::from_str(
            r#"{"content":"fix me","mode":"chat","language":" "}"#,
        )
        .unwrap();
        assert_eq!(task.content(), "fix me");
        assert_eq!(task.language(), None);
        assert!(task.history().is_empty());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("chat".parse::<Mode>().ok(), Some(Mode::Chat));
        assert_eq!("code_fix".parse::<Mode>().ok(), Some(Mode::CodeFix));
        assert_eq!("QC".parse::<Mode>().ok(), Some(Mode::QcVerification));
        assert_eq!("seq".parse::<Mode>().ok(), Some(Mode::SequenceAnalysis));
        assert!("poetry".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_display_matches_parse() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().ok(), Some(mode));
        }
    }

    #[test]
    fn test_is_code() {
        assert!(Mode::CodeFix.is_code());
        assert!(Mode::CodeExplain.is_code());
        assert!(!Mode::DatasetSearch.is_code());
    }
}
