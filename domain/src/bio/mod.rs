//! Biology helpers used by the sequence-analysis formatter.

pub mod sequence;
