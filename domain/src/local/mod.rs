//! Local engine domain
//!
//! The state machine of the on-device model. The lifecycle service that drives
//! it lives in the application layer.

pub mod state;
