//! Gemini backend adapter.
//!
//! Implements [`BackendAdapter`] over the Generative Language API
//! (`POST {base_url}/models/{model}:generateContent`). One adapter instance
//! serves one role; the deep-research instance enables search grounding.

use async_trait::async_trait;
use helix_application::ports::backend::{BackendAdapter, BackendError, ensure_prompt};
use helix_domain::ErrorKind;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::FileGeminiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini adapter configuration with a resolved API key
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    /// Attach the `google_search` tool so the model may consult the web
    pub grounding: bool,
}

impl GeminiConfig {
    /// Build from the `[providers.gemini]` section.
    ///
    /// The API key is resolved here, once: the inline key wins, then the
    /// configured environment variable. Fails with a pre-classified
    /// `ApiKeyMissing` error when neither yields a non-blank key.
    pub fn from_file(
        file: &FileGeminiConfig,
        model: impl Into<String>,
        grounding: bool,
    ) -> Result<Self, BackendError> {
        let api_key = resolve_api_key(file.api_key.as_deref(), &file.api_key_env, |name| {
            std::env::var(name).ok()
        })?;
        Ok(Self {
            api_key,
            model: model.into(),
            base_url: file.base_url.trim_end_matches('/').to_string(),
            timeout_secs: file.timeout_secs,
            temperature: file.temperature,
            grounding,
        })
    }
}

/// Pick the inline key if set, otherwise look up `env_var`.
pub fn resolve_api_key(
    inline: Option<&str>,
    env_var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, BackendError> {
    inline
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| lookup(env_var).filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| BackendError::api_key_missing(env_var))
}

pub struct GeminiBackend {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn headers(&self) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key).map_err(|_| {
            BackendError::Classified {
                kind: ErrorKind::ApiKeyMissing,
                message: "API_KEY contains characters not allowed in a header".to_string(),
            }
        })?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    fn request_body(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
            tools: self.config.grounding.then(|| {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            }),
        }
    }
}

#[async_trait]
impl BackendAdapter for GeminiBackend {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        ensure_prompt(prompt)?;
        debug!(
            model = %self.config.model,
            grounding = self.config.grounding,
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(self.url())
            .headers(self.headers()?)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(default)]
    details: Vec<ErrorInfo>,
}

/// One `google.rpc.ErrorInfo` entry; only the machine-readable reason matters here
#[derive(Debug, Deserialize)]
struct ErrorInfo {
    reason: Option<String>,
}

impl ErrorDetail {
    /// Gemini answers a bad key with 400 INVALID_ARGUMENT, not 401
    fn is_key_rejection(&self, status: u16) -> bool {
        self.details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
            || (status == 400 && self.message.to_lowercase().contains("api key"))
    }
}

/// Finish reasons that mean the candidate was withheld on content grounds
const BLOCKING_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Extract the answer text from a successful response body.
fn parse_response(body: &str) -> Result<String, BackendError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked(format!("prompt blocked ({})", reason)));
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Err(BackendError::InvalidResponse(
            "no candidates in response".to_string(),
        ));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return match candidate.finish_reason {
            Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => Err(
                BackendError::Blocked(format!("candidate withheld ({})", reason)),
            ),
            reason => Err(BackendError::InvalidResponse(format!(
                "empty candidate (finish reason: {})",
                reason.as_deref().unwrap_or("none")
            ))),
        };
    }

    Ok(text)
}

/// Map a non-success status onto an error whose message classifies correctly.
fn error_for_status(status: u16, body: &str) -> BackendError {
    let (detail, key_rejected) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let rejected = envelope.error.is_key_rejection(status);
            (envelope.error.message, rejected)
        }
        Err(_) => (body.trim().to_string(), false),
    };

    let message = match status {
        429 => format!("quota exceeded: {}", detail),
        401 | 403 => format!("API_KEY rejected: {}", detail),
        _ if key_rejected => format!("API_KEY rejected: {}", detail),
        _ => detail,
    };
    BackendError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_application::{ErrorClassifier, PatternErrorClassifier};

    fn config(grounding: bool) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://example.invalid/v1beta".to_string(),
            timeout_secs: 5,
            temperature: None,
            grounding,
        }
    }

    fn kind_of(error: &BackendError) -> ErrorKind {
        PatternErrorClassifier::default().classify(error)
    }

    #[test]
    fn test_resolve_api_key_prefers_inline() {
        let key = resolve_api_key(Some("inline"), "GEMINI_API_KEY", |_| Some("env".into()));
        assert_eq!(key.unwrap(), "inline");
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_env() {
        let key = resolve_api_key(Some("  "), "GEMINI_API_KEY", |name| {
            (name == "GEMINI_API_KEY").then(|| "env".to_string())
        });
        assert_eq!(key.unwrap(), "env");
    }

    #[test]
    fn test_missing_key_is_api_key_missing() {
        let err = resolve_api_key(None, "GEMINI_API_KEY", |_| None).unwrap_err();
        assert_eq!(kind_of(&err), ErrorKind::ApiKeyMissing);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_url_and_headers() {
        let backend = GeminiBackend::new(config(false)).unwrap();
        assert_eq!(
            backend.url(),
            "https://example.invalid/v1beta/models/gemini-2.5-flash:generateContent"
        );
        let headers = backend.headers().unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "test-key");
    }

    #[test]
    fn test_request_body_grounding_adds_search_tool() {
        let plain = GeminiBackend::new(config(false)).unwrap();
        let json = serde_json::to_value(plain.request_body("hi")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json.get("tools").is_none());
        assert!(json.get("generationConfig").is_none());

        let grounded = GeminiBackend::new(GeminiConfig {
            temperature: Some(0.3),
            ..config(true)
        })
        .unwrap();
        let json = serde_json::to_value(grounded.request_body("hi")).unwrap();
        assert!(json["tools"][0]["google_search"].is_object());
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_response_prompt_blocked() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, BackendError::Blocked(_)));
        assert_eq!(kind_of(&err), ErrorKind::SafetyFilter);
    }

    #[test]
    fn test_parse_response_candidate_withheld() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(
            kind_of(&parse_response(body).unwrap_err()),
            ErrorKind::SafetyFilter
        );
    }

    #[test]
    fn test_parse_response_empty_is_invalid() {
        let err = parse_response(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
        assert_eq!(kind_of(&err), ErrorKind::Unknown);

        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[test]
    fn test_error_for_status_classifies() {
        let quota = error_for_status(
            429,
            r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(
            quota.to_string(),
            "HTTP 429: quota exceeded: Resource has been exhausted"
        );
        assert_eq!(kind_of(&quota), ErrorKind::RateLimit);

        let rejected = error_for_status(403, "forbidden");
        assert_eq!(kind_of(&rejected), ErrorKind::ApiKeyMissing);

        let server = error_for_status(500, "internal");
        assert_eq!(server.to_string(), "HTTP 500: internal");
        assert_eq!(kind_of(&server), ErrorKind::Unknown);
    }

    #[test]
    fn test_invalid_key_400_is_api_key_error() {
        let invalid = error_for_status(
            400,
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID","domain":"googleapis.com","metadata":{"service":"generativelanguage.googleapis.com"}}]}}"#,
        );
        assert_eq!(
            invalid.to_string(),
            "HTTP 400: API_KEY rejected: API key not valid. Please pass a valid API key."
        );
        assert_eq!(kind_of(&invalid), ErrorKind::ApiKeyMissing);

        let reason_only = error_for_status(
            400,
            r#"{"error":{"code":400,"message":"Invalid argument","details":[{"reason":"API_KEY_INVALID"}]}}"#,
        );
        assert_eq!(kind_of(&reason_only), ErrorKind::ApiKeyMissing);

        let bad_request = error_for_status(
            400,
            r#"{"error":{"code":400,"message":"Invalid JSON payload received.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            bad_request.to_string(),
            "HTTP 400: Invalid JSON payload received."
        );
        assert_eq!(kind_of(&bad_request), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_request() {
        let backend = GeminiBackend::new(config(false)).unwrap();
        assert_eq!(
            backend.invoke("   ").await.unwrap_err(),
            BackendError::EmptyPrompt
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let backend = GeminiBackend::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..config(false)
        })
        .unwrap();
        let err = backend.invoke("hello").await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
        assert_eq!(kind_of(&err), ErrorKind::NetworkError);
    }
}
