//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Task cannot be empty")]
    EmptyTask,

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Invalid judge failure policy: {0}")]
    InvalidPolicy(String),
}
