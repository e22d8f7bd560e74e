//! Output formatting for consensus outcomes

pub mod console;
pub mod formatter;
