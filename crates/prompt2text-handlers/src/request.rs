// Inbound request parsing
//
// The handler sees either an API-Gateway-shaped event whose `body` field is
// a JSON string, or (for direct invocations, e.g. the deploy smoke test)
// the request object itself. Both reduce to the same three fields.

use crate::error::ChatError;
use serde_json::Value;

pub const DEFAULT_SESSION: &str = "default-session";

/// A parsed chat request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub prompt: String,
    pub session_id: String,
    pub model: String,
}

impl ChatRequest {
    /// Parse from a raw JSON body string
    pub fn parse(body: &str, default_model: &str) -> Result<Self, ChatError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ChatError::Internal(format!("request body is not valid JSON: {}", e)))?;
        Self::from_value(&value, default_model)
    }

    /// Parse from an already-deserialized JSON object
    pub fn from_value(value: &Value, default_model: &str) -> Result<Self, ChatError> {
        let prompt = value
            .get("prompt")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if prompt.is_empty() {
            return Err(ChatError::MissingPrompt);
        }

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION);

        let model = value
            .get("model")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(default_model);

        Ok(Self {
            prompt: prompt.to_string(),
            session_id: session_id.to_string(),
            model: model.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_request_parses() {
        let req = ChatRequest::parse(
            r#"{"prompt": "Hello!", "sessionId": "abc", "model": "claude-haiku"}"#,
            "nova-lite",
        )
        .unwrap();
        assert_eq!(req.prompt, "Hello!");
        assert_eq!(req.session_id, "abc");
        assert_eq!(req.model, "claude-haiku");
    }

    #[test]
    fn defaults_fill_in_session_and_model() {
        let req = ChatRequest::parse(r#"{"prompt": "Hello!"}"#, "nova-lite").unwrap();
        assert_eq!(req.session_id, DEFAULT_SESSION);
        assert_eq!(req.model, "nova-lite");
    }

    #[test]
    fn missing_prompt_is_deterministic_error() {
        let err = ChatRequest::parse(r#"{"sessionId": "abc"}"#, "nova-lite").unwrap_err();
        assert!(matches!(err, ChatError::MissingPrompt));

        // Empty string counts as missing, not as a valid prompt
        let err = ChatRequest::parse(r#"{"prompt": ""}"#, "nova-lite").unwrap_err();
        assert!(matches!(err, ChatError::MissingPrompt));

        // Non-string prompt counts as missing too
        let err = ChatRequest::parse(r#"{"prompt": 42}"#, "nova-lite").unwrap_err();
        assert!(matches!(err, ChatError::MissingPrompt));
    }

    #[test]
    fn malformed_json_reports_parse_failure() {
        let err = ChatRequest::parse("{not json", "nova-lite").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn empty_session_falls_back_to_default() {
        let req =
            ChatRequest::parse(r#"{"prompt": "hi", "sessionId": ""}"#, "nova-lite").unwrap();
        assert_eq!(req.session_id, DEFAULT_SESSION);
    }
}
