//! Local engine configuration from TOML (`[local]` section)

use serde::{Deserialize, Serialize};

/// On-device model served by a local Ollama runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocalConfig {
    /// Let the local verifier call the local model
    pub enabled: bool,
    /// Ollama endpoint
    pub base_url: String,
    /// Model tag pulled and used for generation
    pub model: String,
    /// Start loading the model before the first run
    pub auto_init: bool,
}

impl Default for FileLocalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:1.5b".to_string(),
            auto_init: true,
        }
    }
}
