//! Prompt domain
//!
//! One [`TaskFormatter`] per [`Mode`](crate::Mode) builds the per-role prompts
//! and the judge prompt; [`template`] holds the pieces they share.

pub mod chat;
pub mod code;
pub mod dataset;
mod formatter;
pub mod qc;
pub mod sequence;
pub mod template;

pub use code::{extract_code, find_fenced_block};
pub use formatter::{TaskFormatter, formatter_for};
