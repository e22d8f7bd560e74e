//! Infrastructure layer for helix-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini backend, the Ollama local runtime,
//! configuration file loading and the JSONL run transcript.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSource, ConfigValidationError, FileConfig, FileLocalConfig,
    FileLoggingConfig, FileModelsConfig, FileOutputConfig, FileReplConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::{OllamaRuntime, build_backends};
