//! Error classification
//!
//! Maps raw [`BackendError`]s onto the closed [`ErrorKind`] taxonomy.
//!
//! The default [`PatternErrorClassifier`] matches substrings of the rendered
//! error message, which is fragile against provider wording changes. It sits
//! behind the [`ErrorClassifier`] trait so it can be replaced by one that reads
//! structured provider error codes without touching the orchestrator.

use crate::ports::backend::BackendError;
use helix_domain::{ClassifiedError, ErrorKind};
use tracing::warn;

/// Identifier whose mention marks a missing/invalid API key
pub const DEFAULT_API_KEY_IDENTIFIER: &str = "API_KEY";

pub trait ErrorClassifier: Send + Sync {
    /// Deterministically map a raw error to its kind
    fn classify(&self, error: &BackendError) -> ErrorKind;
}

/// Substring-based classifier with a fixed precedence table.
///
/// First match wins, case-insensitively:
///
/// | # | Message mentions            | Kind               |
/// |---|-----------------------------|--------------------|
/// | 1 | the API-key identifier      | `ApiKeyMissing`    |
/// | 2 | `fetch`, `network`          | `NetworkError`     |
/// | 3 | `safety`, `blocked`         | `SafetyFilter`     |
/// | 4 | `429`, `quota`              | `RateLimit`        |
/// | 5 | `WebGPU`, `not supported`   | `LocalUnsupported` |
/// | 6 | anything else               | `Unknown`          |
///
/// Errors already carrying a kind ([`BackendError::Classified`]) are returned
/// unchanged.
#[derive(Debug, Clone)]
pub struct PatternErrorClassifier {
    api_key_identifier: String,
}

impl PatternErrorClassifier {
    pub fn new(api_key_identifier: impl Into<String>) -> Self {
        Self {
            api_key_identifier: api_key_identifier.into().to_lowercase(),
        }
    }

    pub fn classify_message(&self, message: &str) -> ErrorKind {
        let message = message.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

        if message.contains(&self.api_key_identifier) {
            ErrorKind::ApiKeyMissing
        } else if mentions(&["fetch", "network"]) {
            ErrorKind::NetworkError
        } else if mentions(&["safety", "blocked"]) {
            ErrorKind::SafetyFilter
        } else if mentions(&["429", "quota"]) {
            ErrorKind::RateLimit
        } else if mentions(&["webgpu", "not supported"]) {
            ErrorKind::LocalUnsupported
        } else {
            ErrorKind::Unknown
        }
    }
}

impl Default for PatternErrorClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_IDENTIFIER)
    }
}

impl ErrorClassifier for PatternErrorClassifier {
    fn classify(&self, error: &BackendError) -> ErrorKind {
        match error {
            BackendError::Classified { kind, .. } => *kind,
            other => self.classify_message(&other.to_string()),
        }
    }
}

/// Classify `error` and log the result with a timestamp and the raw cause.
///
/// `source` names where the error came from (a role, "judge", "startup").
pub fn classify_logged(
    classifier: &dyn ErrorClassifier,
    error: &BackendError,
    source: &str,
) -> ClassifiedError {
    let kind = classifier.classify(error);
    let at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    warn!(
        %at,
        source,
        kind = %kind,
        transient = kind.is_transient(),
        raw = ?error,
        "Classified backend error: {}",
        error
    );
    ClassifiedError::new(kind, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: &str) -> ErrorKind {
        PatternErrorClassifier::default().classify(&BackendError::Other(message.to_string()))
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("GEMINI_API_KEY is not set"), ErrorKind::ApiKeyMissing);
        assert_eq!(classify("Failed to fetch"), ErrorKind::NetworkError);
        assert_eq!(classify("Network unreachable"), ErrorKind::NetworkError);
        assert_eq!(classify("Candidate was blocked due to SAFETY"), ErrorKind::SafetyFilter);
        assert_eq!(classify("HTTP 429 Too Many Requests"), ErrorKind::RateLimit);
        assert_eq!(classify("Quota exceeded for model"), ErrorKind::RateLimit);
        assert_eq!(classify("WebGPU is unavailable"), ErrorKind::LocalUnsupported);
        assert_eq!(classify("operation not supported on this device"), ErrorKind::LocalUnsupported);
        assert_eq!(classify("something odd happened"), ErrorKind::Unknown);
    }

    #[test]
    fn test_precedence_network_before_rate_limit() {
        assert_eq!(classify("network error after 429"), ErrorKind::NetworkError);
    }

    #[test]
    fn test_precedence_full_table() {
        assert_eq!(classify("api_key invalid: network blocked 429"), ErrorKind::ApiKeyMissing);
        assert_eq!(classify("fetch blocked by safety"), ErrorKind::NetworkError);
        assert_eq!(classify("blocked: quota"), ErrorKind::SafetyFilter);
        assert_eq!(classify("quota: WebGPU not supported"), ErrorKind::RateLimit);
    }

    #[test]
    fn test_structured_variants_classified_by_message() {
        let classifier = PatternErrorClassifier::default();
        assert_eq!(
            classifier.classify(&BackendError::Network("connection refused".into())),
            ErrorKind::NetworkError
        );
        assert_eq!(
            classifier.classify(&BackendError::Http {
                status: 429,
                message: "Resource has been exhausted".into()
            }),
            ErrorKind::RateLimit
        );
        assert_eq!(
            classifier.classify(&BackendError::Blocked("SAFETY".into())),
            ErrorKind::SafetyFilter
        );
        assert_eq!(
            classifier.classify(&BackendError::Unsupported("no server".into())),
            ErrorKind::LocalUnsupported
        );
    }

    #[test]
    fn test_classified_error_passes_through_unchanged() {
        let classifier = PatternErrorClassifier::default();
        let err = BackendError::Classified {
            kind: ErrorKind::LocalInitFailed,
            message: "network went away while loading".into(),
        };
        assert_eq!(classifier.classify(&err), ErrorKind::LocalInitFailed);
    }

    #[test]
    fn test_classify_logged_keeps_raw_message() {
        let classifier = PatternErrorClassifier::default();
        let classified =
            classify_logged(&classifier, &BackendError::Other("quota hit".into()), "judge");
        assert_eq!(classified.kind, ErrorKind::RateLimit);
        assert_eq!(classified.message, "quota hit");
    }

    #[test]
    fn test_custom_identifier() {
        let classifier = PatternErrorClassifier::new("GEMINI_KEY");
        assert_eq!(classifier.classify_message("gemini_key unset"), ErrorKind::ApiKeyMissing);
        assert_eq!(classifier.classify_message("API_KEY unset"), ErrorKind::Unknown);
    }
}
