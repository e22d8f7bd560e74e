//! `[output]` section: how results are rendered

use helix_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// ```toml
/// [output]
/// format = "full"   # final | full | json
/// color = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Left unset so an explicit `--output` flag can be told apart from the default
    pub format: Option<OutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_keeps_color_default() {
        let config: FileOutputConfig = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert!(config.color);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<FileOutputConfig>(r#"format = "synthesis""#).is_err());
    }
}
