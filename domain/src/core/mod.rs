//! Core domain concepts shared across all subdomains.
//!
//! - [`task::Task`]: a validated, immutable user task and its [`task::Mode`]
//! - [`error_kind::ErrorKind`]: the closed taxonomy of backend failures
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod error_kind;
pub mod string;
pub mod task;
