//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod backend;
pub mod conversation_logger;
pub mod local_runtime;
pub mod progress;
