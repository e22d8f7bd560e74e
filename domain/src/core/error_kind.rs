//! Closed taxonomy of backend failures.
//!
//! Every failure from any backend, the local engine or the judge ends up as
//! exactly one [`ErrorKind`]. The kind travels with the per-role
//! [`AgentResult`](crate::AgentResult) and with the terminal error shown to the
//! user, so it is never silently dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The hosted backend's API key is not configured
    ApiKeyMissing,
    /// Transport-level failure reaching a backend
    NetworkError,
    /// The provider refused the prompt or response on content-safety grounds
    SafetyFilter,
    /// Provider quota or rate limit exhausted
    RateLimit,
    /// The machine cannot run the local engine at all
    LocalUnsupported,
    /// The local engine failed to load or is not ready
    LocalInitFailed,
    /// Anything else; the raw error is kept alongside for diagnostics
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ApiKeyMissing => "ApiKeyMissing",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::SafetyFilter => "SafetyFilter",
            ErrorKind::RateLimit => "RateLimit",
            ErrorKind::LocalUnsupported => "LocalUnsupported",
            ErrorKind::LocalInitFailed => "LocalInitFailed",
            ErrorKind::Unknown => "Unknown",
        }
    }

    /// Human-readable, user-actionable explanation
    pub fn user_hint(&self) -> &'static str {
        match self {
            ErrorKind::ApiKeyMissing => {
                "The API key is missing. Set it in the environment or the config file and retry."
            }
            ErrorKind::NetworkError => {
                "A model backend could not be reached. Check your connection and retry."
            }
            ErrorKind::SafetyFilter => {
                "The request was blocked by the provider's safety filter. Rephrase the task."
            }
            ErrorKind::RateLimit => "The provider quota was exceeded. Wait a moment and retry.",
            ErrorKind::LocalUnsupported => {
                "The local model runtime is not available on this machine."
            }
            ErrorKind::LocalInitFailed => {
                "The local model failed to load. Restart to try loading it again."
            }
            ErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    /// Whether a hardened caller could reasonably retry after a backoff.
    ///
    /// The orchestrator itself never retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::NetworkError | ErrorKind::RateLimit)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure after classification: the kind plus the raw message it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ClassifiedError {}
