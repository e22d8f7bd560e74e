//! Model backends: hosted Gemini roles and the local Ollama runtime.

pub mod gemini;
pub mod ollama;

use crate::config::FileConfig;
use gemini::{GeminiBackend, GeminiConfig};
use helix_application::{AgentBackends, BackendError};
use std::sync::Arc;

pub use gemini::resolve_api_key;
pub use ollama::OllamaRuntime;

/// Build the hosted backend for every remote role.
///
/// Fails fast with a pre-classified `ApiKeyMissing` error when the API key
/// cannot be resolved, before any network call is made. Only the
/// deep-research backend enables search grounding.
pub fn build_backends(config: &FileConfig) -> Result<AgentBackends, BackendError> {
    let gemini = &config.providers.gemini;
    let backend = |model: &str, grounding: bool| -> Result<_, BackendError> {
        let backend = GeminiBackend::new(GeminiConfig::from_file(gemini, model, grounding)?)?;
        Ok(Arc::new(backend))
    };

    Ok(AgentBackends {
        primary_fast: backend(&config.models.primary, false)?,
        deep_research: backend(&config.models.deep_research, true)?,
        judge: backend(&config.models.judge, false)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_application::{ErrorClassifier, PatternErrorClassifier};
    use helix_domain::ErrorKind;

    #[test]
    fn test_build_backends_with_inline_key() {
        let mut config = FileConfig::default();
        config.providers.gemini.api_key = Some("inline-key".to_string());

        let backends = build_backends(&config).unwrap();
        assert_eq!(backends.primary_fast.name(), "gemini-2.5-flash");
        assert_eq!(backends.deep_research.name(), "gemini-2.5-pro");
        assert_eq!(backends.judge.name(), "gemini-2.5-pro");
    }

    #[test]
    fn test_build_backends_without_key_fails_fast() {
        let mut config = FileConfig::default();
        config.providers.gemini.api_key_env = "HELIX_TEST_UNSET_KEY_VARIABLE".to_string();

        let err = match build_backends(&config) {
            Ok(_) => panic!("expected a missing API key"),
            Err(e) => e,
        };
        assert_eq!(
            PatternErrorClassifier::default().classify(&err),
            ErrorKind::ApiKeyMissing
        );
    }
}
