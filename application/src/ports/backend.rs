//! Backend Adapter port
//!
//! Defines the uniform interface to one reasoning backend. Implementations
//! (hosted endpoints) live in the infrastructure layer; the local model is
//! reached through [`LocalRuntime`](super::local_runtime::LocalRuntime) instead.

use async_trait::async_trait;
use helix_domain::ErrorKind;
use thiserror::Error;

/// Raw failure from a backend.
///
/// Adapters report what happened without interpreting it; the
/// [`ErrorClassifier`](crate::classifier::ErrorClassifier) maps the rendered
/// message onto an [`ErrorKind`] upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("response blocked by safety filter: {0}")]
    Blocked(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("local runtime not supported: {0}")]
    Unsupported(String),

    /// Already classified at the source; re-classification returns `kind` unchanged
    #[error("{message}")]
    Classified { kind: ErrorKind, message: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// The API key could not be resolved when the adapter was constructed.
    pub fn api_key_missing(env_var: &str) -> Self {
        BackendError::Classified {
            kind: ErrorKind::ApiKeyMissing,
            message: format!("API_KEY missing: set the {} environment variable", env_var),
        }
    }

    /// The local engine is not in a state that allows generation.
    pub fn local_not_ready(state: impl std::fmt::Display) -> Self {
        BackendError::Classified {
            kind: ErrorKind::LocalInitFailed,
            message: format!("local engine is not ready (state: {})", state),
        }
    }
}

/// Reject empty prompts before any work is done.
pub fn ensure_prompt(prompt: &str) -> Result<(), BackendError> {
    if prompt.trim().is_empty() {
        Err(BackendError::EmptyPrompt)
    } else {
        Ok(())
    }
}

/// One reasoning backend.
///
/// `invoke` makes exactly one attempt: no retries happen inside an adapter.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Identifier for logs (typically the model name)
    fn name(&self) -> &str;

    /// Send a single prompt and return the complete response text
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;
}
