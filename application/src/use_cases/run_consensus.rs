//! Run Consensus use case
//!
//! Orchestrates one consensus run: fan a task out to every non-judge role,
//! wait for all of them to settle, then run a single judge pass.
//!
//! ```text
//! Idle ──▶ FanOut ──(all roles settled)──▶ Judge ──▶ Settled(outcome)
//! ```
//!
//! - Every run yields exactly one [`AgentResult`] per role in
//!   [`AgentRole::FAN_OUT`], in that order, whatever the completion order.
//! - A failing role never aborts the run: its error is classified and the
//!   result carries a placeholder text.
//! - The local verifier only calls the local engine when it is Ready;
//!   otherwise it contributes the formatter's fallback text without error.
//! - Only a judge failure makes the run unsuccessful.
//!
//! The use case holds no state between runs apart from the shared
//! [`LocalEngine`].

use crate::classifier::{ErrorClassifier, PatternErrorClassifier, classify_logged};
use crate::config::ConsensusParams;
use crate::ports::backend::{BackendAdapter, BackendError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{ConsensusProgress, NoProgress};
use crate::use_cases::local_engine::LocalEngine;
use helix_domain::{
    AgentResult, AgentRole, ConsensusOutcome, JudgeFailurePolicy, Phase, Task, TaskFormatter,
    formatter_for,
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a run without an outcome
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunConsensusError {
    #[error("Consensus run cancelled")]
    Cancelled,
}

/// Hosted backends assigned to each remote role
#[derive(Clone)]
pub struct AgentBackends {
    pub primary_fast: Arc<dyn BackendAdapter>,
    pub deep_research: Arc<dyn BackendAdapter>,
    pub judge: Arc<dyn BackendAdapter>,
}

/// Use case for running a consensus over one task
pub struct RunConsensusUseCase {
    backends: AgentBackends,
    local: Arc<LocalEngine>,
    classifier: Arc<dyn ErrorClassifier>,
    params: ConsensusParams,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunConsensusUseCase {
    pub fn new(backends: AgentBackends, local: Arc<LocalEngine>) -> Self {
        Self {
            backends,
            local,
            classifier: Arc::new(PatternErrorClassifier::default()),
            params: ConsensusParams::default(),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_params(mut self, params: ConsensusParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Honor a user-initiated stop: in-flight backend and judge calls are
    /// abandoned and the run ends with [`RunConsensusError::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn local_engine(&self) -> &Arc<LocalEngine> {
        &self.local
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, task: &Task) -> Result<ConsensusOutcome, RunConsensusError> {
        self.execute_with_progress(task, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        task: &Task,
        progress: &dyn ConsensusProgress,
    ) -> Result<ConsensusOutcome, RunConsensusError> {
        self.check_cancelled()?;

        let formatter = formatter_for(task.mode());
        info!(mode = %task.mode(), "Starting consensus run");

        let results = self.phase_fan_out(task, formatter.as_ref(), progress).await?;
        let outcome = self
            .phase_judge(task, formatter.as_ref(), results, progress)
            .await?;

        self.logger.log(ConversationEvent::new(
            "consensus_outcome",
            serde_json::to_value(&outcome).unwrap_or_default(),
        ));
        Ok(outcome)
    }

    /// Phase 1: query every non-judge role concurrently and wait for all of them
    async fn phase_fan_out(
        &self,
        task: &Task,
        formatter: &dyn TaskFormatter,
        progress: &dyn ConsensusProgress,
    ) -> Result<Vec<AgentResult>, RunConsensusError> {
        info!("Phase 1: Fan-out");
        progress.on_phase_start(&Phase::FanOut, AgentRole::FAN_OUT.len());

        let prompt_for = |role: AgentRole| formatter.agent_prompt(role, task);

        let (primary, research, local) = tokio::join!(
            self.call_remote(
                AgentRole::PrimaryFast,
                self.backends.primary_fast.as_ref(),
                prompt_for(AgentRole::PrimaryFast),
                progress,
            ),
            self.call_remote(
                AgentRole::DeepResearch,
                self.backends.deep_research.as_ref(),
                prompt_for(AgentRole::DeepResearch),
                progress,
            ),
            self.call_local(prompt_for(AgentRole::LocalVerifier), formatter, progress),
        );

        let results = vec![primary?, research?, local?];
        progress.on_phase_complete(&Phase::FanOut);
        Ok(results)
    }

    /// Phase 2: a single judge call over every role's text
    async fn phase_judge(
        &self,
        task: &Task,
        formatter: &dyn TaskFormatter,
        results: Vec<AgentResult>,
        progress: &dyn ConsensusProgress,
    ) -> Result<ConsensusOutcome, RunConsensusError> {
        info!("Phase 2: Judge");
        progress.on_phase_start(&Phase::Judge, 1);

        let prompt = formatter.judge_prompt(task, &results);
        self.logger.log(ConversationEvent::new(
            "judge_prompt",
            serde_json::json!({ "mode": task.mode(), "prompt": prompt }),
        ));

        let judged = self.cancellable(self.backends.judge.invoke(&prompt)).await?;

        let outcome = match judged {
            Ok(text) => {
                info!(backend = self.backends.judge.name(), "Judge responded");
                let code = formatter.post_process(&text);
                let outcome =
                    ConsensusOutcome::settled(task.content(), task.mode(), text, results);
                match code {
                    Some(code) => outcome.with_code(code),
                    None => outcome,
                }
            }
            Err(e) => {
                let error = self.classify(AgentRole::Judge, &e);
                let fallback = match self.params.judge_failure {
                    JudgeFailurePolicy::Strict => None,
                    JudgeFailurePolicy::BestAgent => {
                        results.iter().find(|r| r.is_answer()).cloned()
                    }
                };
                let outcome =
                    ConsensusOutcome::judge_failed(task.content(), task.mode(), results, error);
                match fallback {
                    Some(best) => {
                        warn!(role = %best.role, "Judge failed, falling back to agent answer");
                        outcome.with_fallback(&best)
                    }
                    None => outcome,
                }
            }
        };

        progress.on_phase_complete(&Phase::Judge);
        Ok(outcome)
    }

    async fn call_remote(
        &self,
        role: AgentRole,
        backend: &dyn BackendAdapter,
        prompt: String,
        progress: &dyn ConsensusProgress,
    ) -> Result<AgentResult, RunConsensusError> {
        debug!(role = %role, backend = backend.name(), "Invoking backend");
        let outcome = self.cancellable(backend.invoke(&prompt)).await?;
        Ok(self.settle(role, outcome, progress))
    }

    async fn call_local(
        &self,
        prompt: String,
        formatter: &dyn TaskFormatter,
        progress: &dyn ConsensusProgress,
    ) -> Result<AgentResult, RunConsensusError> {
        let role = AgentRole::LocalVerifier;

        if !self.params.include_local || !self.local.is_ready() {
            debug!(state = %self.local.state(), "Local verifier degraded to fallback text");
            let result = AgentResult::degraded(role, formatter.local_fallback());
            self.record(&result, progress);
            return Ok(result);
        }

        let on_update = |text: &str| progress.on_local_update(text);
        let outcome = self
            .cancellable(self.local.generate(&prompt, &on_update))
            .await?;
        Ok(self.settle(role, outcome, progress))
    }

    /// Turn a settled backend call into the role's result
    fn settle(
        &self,
        role: AgentRole,
        outcome: Result<String, BackendError>,
        progress: &dyn ConsensusProgress,
    ) -> AgentResult {
        let result = match outcome {
            Ok(text) => {
                info!(role = %role, "Agent responded successfully");
                AgentResult::success(role, text)
            }
            Err(e) => {
                let error = self.classify(role, &e);
                AgentResult::failure(role, error.kind)
            }
        };
        self.record(&result, progress);
        result
    }

    fn record(&self, result: &AgentResult, progress: &dyn ConsensusProgress) {
        progress.on_agent_settled(result);
        self.logger.log(ConversationEvent::new(
            "agent_result",
            serde_json::to_value(result).unwrap_or_default(),
        ));
    }

    fn classify(&self, role: AgentRole, error: &BackendError) -> helix_domain::ClassifiedError {
        let classified = classify_logged(self.classifier.as_ref(), error, role.as_str());
        self.logger.log(ConversationEvent::new(
            "error_classified",
            serde_json::json!({
                "role": role,
                "kind": classified.kind,
                "raw": classified.message,
            }),
        ));
        classified
    }

    /// Race a backend call against the cancellation token, if any
    async fn cancellable<F>(
        &self,
        call: F,
    ) -> Result<Result<String, BackendError>, RunConsensusError>
    where
        F: Future<Output = Result<String, BackendError>>,
    {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(RunConsensusError::Cancelled),
                outcome = call => Ok(outcome),
            },
            None => Ok(call.await),
        }
    }

    fn check_cancelled(&self) -> Result<(), RunConsensusError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunConsensusError::Cancelled);
        }
        Ok(())
    }
}
