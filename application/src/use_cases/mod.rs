//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod local_engine;
pub mod run_consensus;
