//! Domain layer for helix-council
//!
//! This crate contains the core types and pure functions of a consensus run.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Consensus run
//!
//! A [`Task`] is fanned out to every non-judge [`AgentRole`] (fast primary
//! answer, deep research, local verification). Each role settles into exactly
//! one [`AgentResult`]; a judge pass over all of them produces the
//! [`ConsensusOutcome`].
//!
//! ## Error taxonomy
//!
//! Backend failures are classified into the closed [`ErrorKind`] set and never
//! dropped: a failed role carries its kind, a failed judge carries a
//! [`ClassifiedError`].
//!
//! ## Task formatters
//!
//! Each [`Mode`] has a [`TaskFormatter`] that turns the task into role prompts
//! and a judge prompt.

pub mod bio;
pub mod config;
pub mod core;
pub mod local;
pub mod orchestration;
pub mod prompt;

// Re-export commonly used types
pub use bio::sequence::{Alphabet, SequenceStats};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    error_kind::{ClassifiedError, ErrorKind},
    task::{ChatTurn, Mode, Task},
};
pub use local::state::LocalEngineState;
pub use orchestration::{
    entities::Phase,
    policy::JudgeFailurePolicy,
    role::{AgentRole, LOCAL_VERIFIER_FALLBACK},
    value_objects::{AgentResult, ConsensusOutcome},
};
pub use prompt::{TaskFormatter, extract_code, find_fenced_block, formatter_for};
