//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod consensus;
mod local;
mod logging;
mod models;
mod output;
mod providers;
mod repl;

pub use consensus::FileConsensusConfig;
pub use local::FileLocalConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use providers::{DEFAULT_GEMINI_BASE_URL, FileGeminiConfig, FileProvidersConfig};
pub use repl::FileReplConfig;

use helix_application::ConsensusParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("models.{field}: model name cannot be empty")]
    EmptyModelName { field: &'static str },

    #[error("providers.gemini.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("providers.gemini.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("local.{field} cannot be empty while the local engine is enabled")]
    EmptyLocalSetting { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Hosted model per role
    pub models: FileModelsConfig,
    /// Hosted provider settings
    pub providers: FileProvidersConfig,
    /// On-device engine settings
    pub local: FileLocalConfig,
    /// Run-level behavior
    pub consensus: FileConsensusConfig,
    /// Log and transcript files
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Chat REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, value) in self.models.entries() {
            if value.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyModelName { field });
            }
        }

        let gemini = &self.providers.gemini;
        if gemini.timeout_secs == 0 {
            errors.push(ConfigValidationError::InvalidTimeout);
        }
        if let Some(t) = gemini.temperature
            && !(0.0..=2.0).contains(&t)
        {
            errors.push(ConfigValidationError::InvalidTemperature(t));
        }

        if self.local.enabled {
            if self.local.model.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyLocalSetting { field: "model" });
            }
            if self.local.base_url.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyLocalSetting { field: "base_url" });
            }
        }

        errors
    }

    /// Run parameters for the consensus use case
    pub fn consensus_params(&self) -> ConsensusParams {
        ConsensusParams::default()
            .with_judge_failure(self.consensus.judge_failure)
            .with_include_local(self.local.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_domain::{JudgeFailurePolicy, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[models]
primary = "gemini-2.5-flash-lite"
deep_research = "gemini-2.5-pro"
judge = "gemini-2.5-flash"

[providers.gemini]
api_key_env = "MY_GEMINI_KEY"
timeout_secs = 30
temperature = 0.2

[local]
enabled = false
model = "llama3.2:1b"

[consensus]
judge_failure = "best_agent"

[logging]
transcript = "/tmp/helix.jsonl"

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.primary, "gemini-2.5-flash-lite");
        assert_eq!(config.models.judge, "gemini-2.5-flash");
        assert_eq!(config.providers.gemini.api_key_env, "MY_GEMINI_KEY");
        assert_eq!(config.providers.gemini.timeout_secs, 30);
        assert_eq!(config.providers.gemini.temperature, Some(0.2));
        assert_eq!(config.providers.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(!config.local.enabled);
        assert_eq!(config.local.model, "llama3.2:1b");
        assert_eq!(config.local.base_url, "http://localhost:11434");
        assert_eq!(config.consensus.judge_failure, JudgeFailurePolicy::BestAgent);
        assert_eq!(config.logging.transcript.as_deref(), Some("/tmp/helix.jsonl"));
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_config_is_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.providers.gemini.api_key_env, "GEMINI_API_KEY");
        assert!(config.local.auto_init);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = FileConfig::default();
        config.models.judge = "  ".to_string();
        config.providers.gemini.timeout_secs = 0;
        config.providers.gemini.temperature = Some(3.5);
        config.local.model = String::new();

        let errors = config.validate();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::EmptyModelName { field: "judge" },
                ConfigValidationError::InvalidTimeout,
                ConfigValidationError::InvalidTemperature(3.5),
                ConfigValidationError::EmptyLocalSetting { field: "model" },
            ]
        );
    }

    #[test]
    fn test_disabled_local_skips_local_validation() {
        let mut config = FileConfig::default();
        config.local.enabled = false;
        config.local.model = String::new();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_consensus_params() {
        let mut config = FileConfig::default();
        config.consensus.judge_failure = JudgeFailurePolicy::BestAgent;
        config.local.enabled = false;

        let params = config.consensus_params();
        assert_eq!(params.judge_failure, JudgeFailurePolicy::BestAgent);
        assert!(!params.include_local);
    }
}
