//! Ollama local runtime.
//!
//! Implements [`LocalRuntime`] against a local Ollama server:
//!
//! - `check_support`: `GET /api/version`
//! - `load`: `POST /api/pull` (NDJSON progress), then an empty-prompt
//!   `POST /api/generate` to bring the model into memory
//! - `generate`: `POST /api/generate` with `stream: true` (NDJSON deltas)

use async_trait::async_trait;
use helix_application::ports::backend::BackendError;
use helix_application::ports::local_runtime::{LocalRuntime, TextCallback};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FileLocalConfig;

#[derive(Debug, Clone)]
pub struct OllamaRuntime {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

#[derive(Debug, Deserialize)]
struct PullStatus {
    #[serde(default)]
    status: String,
    total: Option<u64>,
    completed: Option<u64>,
    error: Option<String>,
}

impl PullStatus {
    /// Human-readable progress line, e.g. `downloading (42%)`
    fn describe(&self) -> String {
        match (self.completed, self.total) {
            (Some(done), Some(total)) if total > 0 => {
                format!("{} ({}%)", self.status, done.saturating_mul(100) / total)
            }
            _ => self.status.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

impl OllamaRuntime {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &FileLocalConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_ndjson<B, T>(
        &self,
        path: &str,
        body: &B,
        mut on_line: impl FnMut(T) -> Result<(), BackendError>,
    ) -> Result<(), BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: ollama_error_message(&message),
            });
        }

        let mut lines = NdjsonLines::default();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?
        {
            for line in lines.push(&chunk) {
                on_line(parse_line(&line)?)?;
            }
        }
        if let Some(line) = lines.finish() {
            on_line(parse_line(&line)?)?;
        }
        Ok(())
    }
}

#[async_trait]
impl LocalRuntime for OllamaRuntime {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn check_support(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url("/api/version"))
            .send()
            .await
            .map_err(|e| BackendError::Unsupported(format!("Ollama unreachable: {}", e)))?;

        let version: VersionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unsupported(format!("unexpected /api/version reply: {}", e)))?;
        debug!(version = %version.version, "Ollama runtime detected");
        Ok(())
    }

    async fn load(&self, on_progress: TextCallback<'_>) -> Result<(), BackendError> {
        let pull = PullRequest {
            model: &self.model,
            stream: true,
        };
        self.post_ndjson("/api/pull", &pull, |status: PullStatus| {
            if let Some(error) = &status.error {
                return Err(BackendError::Other(format!("pull failed: {}", error)));
            }
            on_progress(&status.describe());
            Ok(())
        })
        .await?;

        on_progress("loading model into memory");
        let warm_up = GenerateRequest {
            model: &self.model,
            prompt: "",
            stream: true,
        };
        self.post_ndjson("/api/generate", &warm_up, |chunk: GenerateChunk| {
            chunk_error(&chunk)
        })
        .await
    }

    async fn generate(
        &self,
        prompt: &str,
        on_delta: TextCallback<'_>,
    ) -> Result<String, BackendError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };
        let mut text = String::new();
        self.post_ndjson("/api/generate", &request, |chunk: GenerateChunk| {
            chunk_error(&chunk)?;
            if !chunk.response.is_empty() {
                on_delta(&chunk.response);
                text.push_str(&chunk.response);
            }
            if chunk.done {
                debug!(chars = text.len(), "Local generation finished");
            }
            Ok(())
        })
        .await?;
        Ok(text)
    }
}

fn chunk_error(chunk: &GenerateChunk) -> Result<(), BackendError> {
    match &chunk.error {
        Some(error) => Err(BackendError::Other(format!("Ollama: {}", error))),
        None => Ok(()),
    }
}

fn parse_line<T: DeserializeOwned>(line: &str) -> Result<T, BackendError> {
    serde_json::from_str(line)
        .map_err(|e| BackendError::InvalidResponse(format!("bad NDJSON line: {}", e)))
}

/// Ollama error bodies are `{"error": "..."}`; fall back to the raw body.
fn ollama_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Splits a byte stream into complete newline-terminated lines.
///
/// Chunks may end mid-line (or mid UTF-8 sequence); the remainder is kept
/// until the next chunk completes it.
#[derive(Debug, Default)]
struct NdjsonLines {
    pending: Vec<u8>,
}

impl NdjsonLines {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    fn finish(self) -> Option<String> {
        let line = String::from_utf8_lossy(&self.pending).trim().to_string();
        (!line.is_empty()).then_some(line)
    }
}
