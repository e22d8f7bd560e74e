//! Application layer for helix-council
//!
//! This crate contains use cases, port definitions, error classification and
//! application configuration. It depends only on the domain layer.

pub mod classifier;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use classifier::{ErrorClassifier, PatternErrorClassifier, classify_logged};
pub use config::ConsensusParams;
pub use ports::{
    backend::{BackendAdapter, BackendError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    local_runtime::{LocalRuntime, TextCallback},
    progress::{ConsensusProgress, NoProgress},
};
pub use use_cases::local_engine::LocalEngine;
pub use use_cases::run_consensus::{AgentBackends, RunConsensusError, RunConsensusUseCase};
