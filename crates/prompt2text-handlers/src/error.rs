//! Error classification for the chat pipeline
//!
//! Every error maps to an HTTP status code, a stable error-type string for
//! the response envelope, and a retryability flag that drives the backoff
//! loop. Upstream errors carry the raw service message so failures stay
//! debuggable from the caller's side.

use prompt2text_core::DecodeError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ChatError {
    // 400-level: client errors, never retried
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Prompt too long ({length} chars, max {limit})")]
    PromptTooLong { length: usize, limit: usize },

    #[error("Invalid model '{key}'. Choose from: {valid:?}")]
    UnknownModel { key: String, valid: Vec<&'static str> },

    // 500-level: upstream and internal failures
    #[error("Model invocation failed{}: {message}", code_suffix(.code))]
    Upstream {
        /// Service error code, when the SDK surfaced one
        code: Option<String>,
        message: String,
        retryable: bool,
    },

    /// Circuit breaker is open; the model is not being called at all
    #[error("Model temporarily unavailable, try again shortly")]
    ModelUnavailable,

    #[error("Conversation store error: {0}")]
    History(String),

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn code_suffix(code: &Option<String>) -> String {
    match code {
        Some(c) => format!(" ({})", c),
        None => String::new(),
    }
}

impl ChatError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingPrompt | Self::PromptTooLong { .. } | Self::UnknownModel { .. } => 400,
            Self::Upstream { .. } => 502,
            Self::ModelUnavailable => 503,
            Self::History(_) => 502,
            Self::Decode(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Stable error-type string for response envelopes
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingPrompt => "MissingPrompt",
            Self::PromptTooLong { .. } => "PromptTooLong",
            Self::UnknownModel { .. } => "UnknownModel",
            Self::Upstream { .. } => "UpstreamFailure",
            Self::ModelUnavailable => "ModelUnavailable",
            Self::History(_) => "HistoryFailure",
            Self::Decode(_) => "DecodeFailure",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Whether the caller (or our own backoff loop) may usefully retry
    pub fn retryable(&self) -> bool {
        match self {
            Self::Upstream { retryable, .. } => *retryable,
            Self::ModelUnavailable => true,
            Self::MissingPrompt | Self::PromptTooLong { .. } | Self::UnknownModel { .. } => false,
            Self::History(_) | Self::Decode(_) | Self::Internal(_) => false,
        }
    }
}

impl From<DecodeError> for ChatError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ChatError::MissingPrompt.status_code(), 400);
        assert_eq!(
            ChatError::PromptTooLong { length: 20_000, limit: 10_000 }.status_code(),
            400
        );
        assert_eq!(
            ChatError::UnknownModel { key: "gpt".into(), valid: vec!["nova-lite"] }.status_code(),
            400
        );
        assert_eq!(
            ChatError::Upstream { code: None, message: "boom".into(), retryable: true }
                .status_code(),
            502
        );
        assert_eq!(ChatError::ModelUnavailable.status_code(), 503);
        assert_eq!(ChatError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn retryability() {
        assert!(!ChatError::MissingPrompt.retryable());
        assert!(!ChatError::UnknownModel { key: "x".into(), valid: vec![] }.retryable());
        assert!(ChatError::ModelUnavailable.retryable());
        assert!(
            ChatError::Upstream {
                code: Some("ThrottlingException".into()),
                message: "slow down".into(),
                retryable: true
            }
            .retryable()
        );
        assert!(
            !ChatError::Upstream {
                code: Some("AccessDeniedException".into()),
                message: "no".into(),
                retryable: false
            }
            .retryable()
        );
    }

    #[test]
    fn upstream_message_keeps_raw_error_text() {
        let err = ChatError::Upstream {
            code: Some("ValidationException".into()),
            message: "model identifier is invalid".into(),
            retryable: false,
        };
        let text = err.to_string();
        assert!(text.contains("ValidationException"));
        assert!(text.contains("model identifier is invalid"));
    }

    #[test]
    fn unknown_model_lists_valid_keys() {
        let err = ChatError::UnknownModel {
            key: "gpt-4".into(),
            valid: vec!["nova-lite", "claude-sonnet"],
        };
        let text = err.to_string();
        assert!(text.contains("gpt-4"));
        assert!(text.contains("nova-lite"));
    }
}
