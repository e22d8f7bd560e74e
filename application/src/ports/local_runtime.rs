//! Local Runtime port
//!
//! The on-device model capability. The
//! [`LocalEngine`](crate::use_cases::local_engine::LocalEngine) owns the
//! lifecycle around it; this trait only exposes the raw operations.

use super::backend::BackendError;
use async_trait::async_trait;

/// Callback receiving a progress report or a text fragment
pub type TextCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

#[async_trait]
pub trait LocalRuntime: Send + Sync {
    /// Model identifier for logs
    fn model_name(&self) -> &str;

    /// Precondition check: can this machine run the local model at all?
    async fn check_support(&self) -> Result<(), BackendError>;

    /// Load the model, reporting human-readable progress along the way
    async fn load(&self, on_progress: TextCallback<'_>) -> Result<(), BackendError>;

    /// Generate a completion. `on_delta` receives each new fragment (not the
    /// accumulated text); the return value is the complete text.
    async fn generate(
        &self,
        prompt: &str,
        on_delta: TextCallback<'_>,
    ) -> Result<String, BackendError>;
}
