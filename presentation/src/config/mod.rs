//! Presentation-level configuration
//!
//! Settings for output rendering and the chat REPL, resolved from the CLI
//! flags and the config file (CLI wins).

use helix_domain::OutputFormat;
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Final,
            color: true,
        }
    }
}

impl OutputConfig {
    /// The CLI format wins over the file format, which wins over `final`.
    pub fn resolve(cli: Option<OutputFormat>, file: Option<OutputFormat>, color: bool) -> Self {
        Self {
            format: cli.or(file).unwrap_or_default(),
            color,
        }
    }

    /// Turn colored output off process-wide when disabled
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to the line-editor history file
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, else `<data dir>/helix-council/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("helix-council").join("history.txt")))
    }
}
