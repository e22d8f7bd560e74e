//! Progress reporting for consensus runs

use colored::Colorize;
use helix_application::ConsensusProgress;
use helix_domain::{AgentResult, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

const PREVIEW_CHARS: usize = 60;

/// Reports progress with indicatif bars: one bar per phase and a spinner
/// that previews the local model's output as it streams.
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    local_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            phase_bar: Mutex::new(None),
            local_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_label(phase: &Phase) -> String {
        match phase {
            Phase::FanOut => format!("Phase 1: {}", phase.display_name()),
            Phase::Judge => format!("Phase 2: {}", phase.display_name()),
        }
    }

    /// Spinner for local-model activity, created on first use
    fn local_spinner(&self) -> Option<ProgressBar> {
        let mut slot = self.local_bar.lock().ok()?;
        let bar = slot.get_or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(Self::spinner_style());
            bar.set_prefix("Local model");
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Some(bar.clone())
    }

    fn finish_local(&self) {
        if let Some(bar) = self.local_bar.lock().ok().and_then(|mut b| b.take()) {
            bar.finish_and_clear();
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.phase_bar
            .lock()
            .ok()
            .and_then(|b| b.as_ref().map(|b| b.position()))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsensusProgress for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_agent_settled(&self, result: &AgentResult) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(status_line(result));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if *phase == Phase::FanOut {
            self.finish_local();
        }
        if let Some(pb) = self.phase_bar.lock().ok().and_then(|mut b| b.take()) {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }

    fn on_local_load_progress(&self, progress: &str) {
        if let Some(bar) = self.local_spinner() {
            bar.set_message(progress.to_string());
        }
    }

    fn on_local_update(&self, text_so_far: &str) {
        if let Some(bar) = self.local_spinner() {
            bar.set_message(preview(text_so_far));
        }
    }
}

/// Plain line-based progress (no bars), used when stderr is not a terminal
/// and by the chat REPL.
///
/// Local model output is streamed to stderr as it arrives: only the part of
/// each accumulated snapshot not yet printed is written.
#[derive(Default)]
pub struct SimpleProgress {
    printed: Mutex<usize>,
    last_load: Mutex<String>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Portion of `text_so_far` not yet printed, advancing the cursor
    fn unseen(&self, text_so_far: &str) -> Option<String> {
        let mut printed = self.printed.lock().ok()?;
        let start = if text_so_far.is_char_boundary(*printed) {
            *printed
        } else {
            0
        };
        *printed = text_so_far.len();
        let rest = &text_so_far[start..];
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

impl ConsensusProgress for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        if let Ok(mut printed) = self.printed.lock() {
            *printed = 0;
        }
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            total_tasks
        );
    }

    fn on_agent_settled(&self, result: &AgentResult) {
        eprintln!("  {}", status_line(result));
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }

    fn on_local_load_progress(&self, progress: &str) {
        if let Ok(mut last) = self.last_load.lock()
            && *last != progress
        {
            eprintln!("  {} {}", "local:".dimmed(), progress);
            *last = progress.to_string();
        }
    }

    fn on_local_update(&self, text_so_far: &str) {
        if let Some(rest) = self.unseen(text_so_far) {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "{}", rest.dimmed());
            let _ = err.flush();
        }
    }
}

fn status_line(result: &AgentResult) -> String {
    let label = result.role.label();
    match (result.succeeded, result.degraded, result.error_kind) {
        (true, false, _) => format!("{} {}", "v".green(), label),
        (true, true, _) => format!("{} {} (unavailable)", "-".dimmed(), label),
        (false, _, kind) => format!(
            "{} {} ({})",
            "x".red(),
            label,
            kind.map(|k| k.as_str()).unwrap_or("failed")
        ),
    }
}

/// Last line of the text, shortened for a one-line spinner message
fn preview(text: &str) -> String {
    let line = text.lines().last().unwrap_or_default().trim();
    let chars = line.chars().count();
    if chars <= PREVIEW_CHARS {
        line.to_string()
    } else {
        let tail: String = line.chars().skip(chars - PREVIEW_CHARS).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_domain::{AgentRole, ErrorKind};

    fn hidden() -> ProgressReporter {
        ProgressReporter::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn test_reporter_counts_settled_agents() {
        let reporter = hidden();
        reporter.on_phase_start(&Phase::FanOut, 3);
        reporter.on_agent_settled(&AgentResult::success(AgentRole::PrimaryFast, "a"));
        reporter.on_agent_settled(&AgentResult::failure(
            AgentRole::DeepResearch,
            ErrorKind::RateLimit,
        ));
        assert_eq!(reporter.position(), Some(2));

        reporter.on_phase_complete(&Phase::FanOut);
        assert_eq!(reporter.position(), None);
    }

    #[test]
    fn test_reporter_local_spinner_cleared_after_fan_out() {
        let reporter = hidden();
        reporter.on_phase_start(&Phase::FanOut, 3);
        reporter.on_local_update("partial answer");
        assert!(reporter.local_bar.lock().unwrap().is_some());

        reporter.on_phase_complete(&Phase::FanOut);
        assert!(reporter.local_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_simple_progress_prints_only_unseen_text() {
        let progress = SimpleProgress::new();
        assert_eq!(progress.unseen("The").as_deref(), Some("The"));
        assert_eq!(progress.unseen("The sequence").as_deref(), Some(" sequence"));
        assert_eq!(progress.unseen("The sequence"), None);
    }

    #[test]
    fn test_simple_progress_restarts_on_shorter_snapshot() {
        let progress = SimpleProgress::new();
        progress.unseen("first run output");
        assert_eq!(progress.unseen("new").as_deref(), Some("new"));
    }

    #[test]
    fn test_status_line() {
        colored::control::set_override(false);
        assert_eq!(
            status_line(&AgentResult::failure(AgentRole::PrimaryFast, ErrorKind::NetworkError)),
            "x Primary Agent (fast answer) (NetworkError)"
        );
        assert!(
            status_line(&AgentResult::degraded(AgentRole::LocalVerifier, "n/a"))
                .ends_with("(unavailable)")
        );
    }

    #[test]
    fn test_preview_keeps_tail_of_last_line() {
        assert_eq!(preview("line one\nline two"), "line two");
        let long = "x".repeat(100);
        let shown = preview(&long);
        assert!(shown.starts_with("..."));
        assert!(shown.chars().count() <= PREVIEW_CHARS + 3);
    }
}
