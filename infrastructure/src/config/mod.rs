//! Configuration file loading for helix-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `HELIX_*` environment overrides
//! 2. `--config <path>` specified file
//! 3. Project root: `./helix.toml` or `./.helix.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/helix-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_GEMINI_BASE_URL, FileConfig, FileConsensusConfig,
    FileGeminiConfig, FileLocalConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig,
    FileProvidersConfig, FileReplConfig,
};
pub use loader::{ConfigLoader, ConfigSource, ENV_PREFIX};
