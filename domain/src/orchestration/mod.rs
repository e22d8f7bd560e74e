//! Consensus orchestration domain
//!
//! Roles, phases, per-role results and the settled outcome of a run.

pub mod entities;
pub mod policy;
pub mod role;
pub mod value_objects;
