// Response envelopes
//
// Success and error envelopes serialize as camelCase JSON, matching what
// the web client and the deploy smoke test expect to read.

use crate::error::ChatError;
use prompt2text_core::Usage;
use serde::Serialize;

/// Successful chat reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub success: bool,
    pub session_id: String,
    pub prompt: String,
    pub response: String,
    /// Display name, e.g. "Amazon Nova Lite"
    pub model: String,
    /// Short key, e.g. "nova-lite"
    pub model_key: String,
    /// Messages in the session including this exchange's prompt
    pub conversation_length: usize,
    pub usage: Usage,
    pub performance: Performance,
    /// Set when a best-effort step (e.g. history save) failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Seconds spent in the model call (including retries)
    pub model_duration: f64,
    /// Seconds for the whole request
    pub total_duration: f64,
}

/// Error reply
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReply {
    pub success: bool,
    pub error: String,
    pub error_type: &'static str,
    pub can_retry: bool,
}

impl ErrorReply {
    pub fn from_error(err: &ChatError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            error_type: err.error_type(),
            can_retry: err.retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reply_carries_classification() {
        let err = ChatError::Upstream {
            code: Some("ThrottlingException".into()),
            message: "too fast".into(),
            retryable: true,
        };
        let reply = ErrorReply::from_error(&err);
        assert!(!reply.success);
        assert!(reply.can_retry);
        assert_eq!(reply.error_type, "UpstreamFailure");
        assert!(reply.error.contains("too fast"));

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["canRetry"], true);
        assert_eq!(json["errorType"], "UpstreamFailure");
    }

    #[test]
    fn warning_omitted_when_absent() {
        let reply = ChatReply {
            success: true,
            session_id: "s".into(),
            prompt: "p".into(),
            response: "r".into(),
            model: "Amazon Nova Lite".into(),
            model_key: "nova-lite".into(),
            conversation_length: 1,
            usage: Usage {
                input_tokens: 1,
                output_tokens: 2,
                estimated_cost: 0.0,
            },
            performance: Performance {
                model_duration: 0.5,
                total_duration: 0.6,
            },
            warning: None,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("warning").is_none());
        assert_eq!(json["modelKey"], "nova-lite");
        assert_eq!(json["conversationLength"], 1);
    }
}
