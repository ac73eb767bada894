// Buffered response decoding
//
// Nova wraps the generated text in output.message.content[0].text;
// Claude puts it at content[0].text. A response matching neither shape is
// an error, never an empty default.

use crate::error::DecodeError;
use serde_json::Value;

/// Extract the generated text from a buffered invoke_model response body
pub fn extract_text(body: &[u8]) -> Result<String, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;

    let text = value
        .pointer("/output/message/content/0/text")
        .or_else(|| value.pointer("/content/0/text"))
        .and_then(Value::as_str);

    match text {
        Some(t) => Ok(t.to_string()),
        None => Err(DecodeError::MissingText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nova_shape() {
        let body = serde_json::json!({
            "output": {
                "message": {
                    "role": "assistant",
                    "content": [{ "text": "Bedrock is a managed inference service." }]
                }
            },
            "stopReason": "end_turn"
        });
        let text = extract_text(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "Bedrock is a managed inference service.");
    }

    #[test]
    fn decodes_claude_shape() {
        let body = serde_json::json!({
            "id": "msg_01",
            "content": [{ "type": "text", "text": "Hello from Claude." }],
            "stop_reason": "end_turn"
        });
        let text = extract_text(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "Hello from Claude.");
    }

    #[test]
    fn unknown_shape_is_an_error() {
        let body = br#"{"completion": "legacy shape"}"#;
        assert!(matches!(
            extract_text(body),
            Err(DecodeError::MissingText)
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            extract_text(b"not json"),
            Err(DecodeError::Json(_))
        ));
    }
}
