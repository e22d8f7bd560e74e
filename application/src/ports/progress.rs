//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus run.

use helix_domain::{AgentResult, Phase};

/// Callback for progress updates during a consensus run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ConsensusProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called once per non-judge role as soon as it settles
    fn on_agent_settled(&self, result: &AgentResult);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called while the local engine downloads or loads its model
    fn on_local_load_progress(&self, _progress: &str) {}

    /// Called with the full local-model text produced so far (never a delta)
    fn on_local_update(&self, _text_so_far: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConsensusProgress for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_agent_settled(&self, _result: &AgentResult) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
