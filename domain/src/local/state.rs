//! Local engine lifecycle state

use crate::core::error_kind::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the process-wide local engine.
///
/// Transitions: `Unloaded → Loading → {Ready | Failed}`. `Ready` and `Failed`
/// are terminal for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocalEngineState {
    #[default]
    Unloaded,
    /// Load in flight; carries the latest progress report
    Loading(String),
    Ready,
    Failed(ErrorKind),
}

impl LocalEngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LocalEngineState::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LocalEngineState::Loading(_))
    }

    /// Ready or Failed: no further transition will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocalEngineState::Ready | LocalEngineState::Failed(_))
    }

    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            LocalEngineState::Failed(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for LocalEngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalEngineState::Unloaded => write!(f, "unloaded"),
            LocalEngineState::Loading(progress) if progress.is_empty() => write!(f, "loading"),
            LocalEngineState::Loading(progress) => write!(f, "loading ({})", progress),
            LocalEngineState::Ready => write!(f, "ready"),
            LocalEngineState::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unloaded() {
        assert_eq!(LocalEngineState::default(), LocalEngineState::Unloaded);
    }

    #[test]
    fn test_terminal_states() {
        assert!(LocalEngineState::Ready.is_terminal());
        assert!(LocalEngineState::Failed(ErrorKind::LocalInitFailed).is_terminal());
        assert!(!LocalEngineState::Loading("50%".into()).is_terminal());
        assert!(!LocalEngineState::Unloaded.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LocalEngineState::Loading("pulling 40%".into()).to_string(),
            "loading (pulling 40%)"
        );
        assert_eq!(
            LocalEngineState::Failed(ErrorKind::LocalUnsupported).to_string(),
            "failed (LocalUnsupported)"
        );
    }
}
