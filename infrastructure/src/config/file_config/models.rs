//! Role-based model configuration from TOML (`[models]` section)

use serde::{Deserialize, Serialize};

/// Hosted model used by each remote role
///
/// # Example
///
/// ```toml
/// [models]
/// primary = "gemini-2.5-flash"        # Fast first answer
/// deep_research = "gemini-2.5-pro"    # Grounded, thorough answer
/// judge = "gemini-2.5-pro"            # Reconciles every answer
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub primary: String,
    pub deep_research: String,
    pub judge: String,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            primary: "gemini-2.5-flash".to_string(),
            deep_research: "gemini-2.5-pro".to_string(),
            judge: "gemini-2.5-pro".to_string(),
        }
    }
}

impl FileModelsConfig {
    /// `(field, value)` pairs, for validation and display
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("primary", self.primary.as_str()),
            ("deep_research", self.deep_research.as_str()),
            ("judge", self.judge.as_str()),
        ]
    }
}
