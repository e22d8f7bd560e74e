//! Local Engine lifecycle
//!
//! Owns the on-device model state machine (`Unloaded → Loading → Ready |
//! Failed`). Constructed once at process start and shared by reference with
//! every consensus run; there is no global instance.
//!
//! Only one load can ever be in flight. A caller that arrives while a load is
//! running does not start another one: it waits for the in-flight transition
//! and observes the same terminal state. Progress reports go only to the
//! callback of the caller that started the load.

use crate::ports::backend::{BackendError, ensure_prompt};
use crate::ports::local_runtime::{LocalRuntime, TextCallback};
use helix_domain::{ErrorKind, LocalEngineState};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct LocalEngine {
    runtime: Arc<dyn LocalRuntime>,
    state: watch::Sender<LocalEngineState>,
}

impl LocalEngine {
    pub fn new(runtime: Arc<dyn LocalRuntime>) -> Self {
        let (state, _) = watch::channel(LocalEngineState::Unloaded);
        Self { runtime, state }
    }

    /// Current state snapshot
    pub fn state(&self) -> LocalEngineState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    pub fn model_name(&self) -> &str {
        self.runtime.model_name()
    }

    /// Initialise the engine.
    ///
    /// Idempotent: returns immediately when already Ready or Failed, and waits
    /// for the in-flight load when Loading. Failure is permanent for the life
    /// of the process; there is no automatic retry.
    pub async fn init(&self, on_progress: TextCallback<'_>) -> LocalEngineState {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if *state == LocalEngineState::Unloaded {
                *state = LocalEngineState::Loading(String::new());
                claimed = true;
                true
            } else {
                false
            }
        });

        if !claimed {
            debug!(state = %self.state(), "Local engine init skipped");
            return self.settled().await;
        }

        info!(model = self.runtime.model_name(), "Loading local engine");
        let guard = LoadGuard {
            state: &self.state,
            armed: true,
        };

        let next = match self.load(on_progress).await {
            Ok(()) => LocalEngineState::Ready,
            Err(kind) => LocalEngineState::Failed(kind),
        };

        guard.disarm();
        self.state.send_replace(next.clone());
        info!(state = %next, "Local engine settled");
        next
    }

    async fn load(&self, on_progress: TextCallback<'_>) -> Result<(), ErrorKind> {
        if let Err(e) = self.runtime.check_support().await {
            warn!("Local runtime unsupported: {}", e);
            return Err(ErrorKind::LocalUnsupported);
        }

        let report = |progress: &str| {
            self.state
                .send_replace(LocalEngineState::Loading(progress.to_string()));
            on_progress(progress);
        };

        self.runtime.load(&report).await.map_err(|e| {
            warn!("Local engine failed to load: {}", e);
            ErrorKind::LocalInitFailed
        })
    }

    /// Wait until no load is in flight and return the resulting state
    async fn settled(&self) -> LocalEngineState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }

    /// Generate with the local model.
    ///
    /// Requires Ready; otherwise fails with a `LocalInitFailed` error.
    /// `on_update` always receives the full text produced so far.
    pub async fn generate(
        &self,
        prompt: &str,
        on_update: TextCallback<'_>,
    ) -> Result<String, BackendError> {
        let state = self.state();
        if !state.is_ready() {
            return Err(BackendError::local_not_ready(state));
        }
        ensure_prompt(prompt)?;

        let accumulated = Mutex::new(String::new());
        let on_delta = |delta: &str| {
            if let Ok(mut text) = accumulated.lock() {
                text.push_str(delta);
                on_update(&text);
            }
        };

        let text = self.runtime.generate(prompt, &on_delta).await?;
        if text.is_empty() {
            return Ok(accumulated.into_inner().unwrap_or_default());
        }
        Ok(text)
    }
}

/// Marks the engine Failed if the loading future is dropped before settling,
/// so the engine can never be stuck in Loading.
struct LoadGuard<'a> {
    state: &'a watch::Sender<LocalEngineState>,
    armed: bool,
}

impl LoadGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Local engine load abandoned before completion");
            self.state
                .send_replace(LocalEngineState::Failed(ErrorKind::LocalInitFailed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockRuntime {
        supported: bool,
        load_ok: bool,
        load_delay: Duration,
        loads: AtomicUsize,
        chunks: Vec<&'static str>,
    }

    impl MockRuntime {
        fn ready() -> Self {
            Self {
                supported: true,
                load_ok: true,
                load_delay: Duration::from_millis(20),
                loads: AtomicUsize::new(0),
                chunks: vec!["The ", "sequence ", "is fine."],
            }
        }
    }

    #[async_trait]
    impl LocalRuntime for MockRuntime {
        fn model_name(&self) -> &str {
            "mock-local"
        }

        async fn check_support(&self) -> Result<(), BackendError> {
            if self.supported {
                Ok(())
            } else {
                Err(BackendError::Unsupported("no accelerator".into()))
            }
        }

        async fn load(&self, on_progress: TextCallback<'_>) -> Result<(), BackendError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            on_progress("downloading 50%");
            tokio::time::sleep(self.load_delay).await;
            on_progress("downloading 100%");
            if self.load_ok {
                Ok(())
            } else {
                Err(BackendError::Other("weights corrupted".into()))
            }
        }

        async fn generate(
            &self,
            _prompt: &str,
            on_delta: TextCallback<'_>,
        ) -> Result<String, BackendError> {
            for chunk in &self.chunks {
                on_delta(chunk);
            }
            Ok(self.chunks.concat())
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |text: &str| {
            sink.lock().unwrap().push(text.to_string())
        })
    }

    #[tokio::test]
    async fn test_init_reaches_ready() {
        let engine = LocalEngine::new(Arc::new(MockRuntime::ready()));
        assert_eq!(engine.state(), LocalEngineState::Unloaded);

        let (progress, on_progress) = recorder();
        let state = engine.init(&on_progress).await;

        assert_eq!(state, LocalEngineState::Ready);
        assert!(engine.is_ready());
        assert_eq!(
            *progress.lock().unwrap(),
            vec!["downloading 50%", "downloading 100%"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_init_loads_once() {
        let runtime = Arc::new(MockRuntime::ready());
        let engine = LocalEngine::new(runtime.clone());

        let (first_progress, first_cb) = recorder();
        let (second_progress, second_cb) = recorder();
        let (first, second) = tokio::join!(engine.init(&first_cb), engine.init(&second_cb));

        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
        assert_eq!(first, LocalEngineState::Ready);
        assert_eq!(second, first);
        assert_eq!(first_progress.lock().unwrap().len(), 2);
        assert!(second_progress.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_when_ready_is_noop() {
        let runtime = Arc::new(MockRuntime::ready());
        let engine = LocalEngine::new(runtime.clone());
        engine.init(&|_| {}).await;
        let state = engine.init(&|_| {}).await;

        assert_eq!(state, LocalEngineState::Ready);
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_permanent() {
        let runtime = Arc::new(MockRuntime {
            load_ok: false,
            ..MockRuntime::ready()
        });
        let engine = LocalEngine::new(runtime.clone());

        let state = engine.init(&|_| {}).await;
        assert_eq!(state, LocalEngineState::Failed(ErrorKind::LocalInitFailed));

        let again = engine.init(&|_| {}).await;
        assert_eq!(again, state);
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_runtime_never_loads() {
        let runtime = Arc::new(MockRuntime {
            supported: false,
            ..MockRuntime::ready()
        });
        let engine = LocalEngine::new(runtime.clone());

        let state = engine.init(&|_| {}).await;
        assert_eq!(state, LocalEngineState::Failed(ErrorKind::LocalUnsupported));
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_abandoned_load_does_not_stay_loading() {
        let runtime = Arc::new(MockRuntime {
            load_delay: Duration::from_secs(5),
            ..MockRuntime::ready()
        });
        let engine = LocalEngine::new(runtime);

        let result =
            tokio::time::timeout(Duration::from_millis(10), engine.init(&|_| {})).await;
        assert!(result.is_err());
        assert_eq!(
            engine.state(),
            LocalEngineState::Failed(ErrorKind::LocalInitFailed)
        );
    }

    #[tokio::test]
    async fn test_generate_requires_ready() {
        let engine = LocalEngine::new(Arc::new(MockRuntime::ready()));
        let err = engine.generate("check this", &|_| {}).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Classified {
                kind: ErrorKind::LocalInitFailed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_generate_reports_accumulated_text() {
        let engine = LocalEngine::new(Arc::new(MockRuntime::ready()));
        engine.init(&|_| {}).await;

        let (updates, on_update) = recorder();
        let text = engine.generate("check this", &on_update).await.unwrap();

        assert_eq!(text, "The sequence is fine.");
        assert_eq!(
            *updates.lock().unwrap(),
            vec!["The ", "The sequence ", "The sequence is fine."]
        );
    }
}
