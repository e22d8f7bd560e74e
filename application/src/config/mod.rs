//! Application-level configuration.
//!
//! - [`ConsensusParams`]: judge failure policy and local participation

pub mod consensus_params;

pub use consensus_params::ConsensusParams;
