//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for the council.

mod repl;

pub use repl::{ChatRepl, ChatSession, ReplCommand};
