// Event routing for Lambda
//
// Two event shapes reach this function: API Gateway proxy events, whose
// `body` field is a JSON string (possibly base64), and direct invocations
// (the deploy smoke test, `aws lambda invoke`) where the payload itself is
// the chat request. Both produce an API Gateway proxy response.

use crate::response::{error_response, json_response};
use crate::LambdaProcessor;
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use base64::Engine;
use lambda_runtime::{Error, LambdaEvent};
use prompt2text_handlers::{ChatError, ChatRequest};
use serde_json::Value;
use tracing::info;

pub(crate) async fn handle_event(
    event: LambdaEvent<Value>,
    processor: &LambdaProcessor,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (payload, context) = event.into_parts();
    info!(request_id = %context.request_id, "request received");

    let response = match parse_event(&payload, processor.default_model()) {
        Ok(request) => match processor.process(request).await {
            Ok(reply) => json_response(200, serde_json::to_value(&reply)?),
            Err(err) => error_response(&err),
        },
        Err(err) => error_response(&err),
    };

    Ok(response)
}

fn parse_event(payload: &Value, default_model: &str) -> Result<ChatRequest, ChatError> {
    match payload.get("body") {
        Some(Value::String(body)) => {
            let decoded = if is_base64(payload) {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(body.trim())
                    .map_err(|e| ChatError::Internal(format!("invalid base64 body: {}", e)))?;
                String::from_utf8(bytes)
                    .map_err(|e| ChatError::Internal(format!("body is not UTF-8: {}", e)))?
            } else {
                body.clone()
            };
            ChatRequest::parse(&decoded, default_model)
        }
        // API Gateway with a pre-parsed JSON body (test console)
        Some(body @ Value::Object(_)) => ChatRequest::from_value(body, default_model),
        // Direct invocation: the event itself is the request
        _ => ChatRequest::from_value(payload, default_model),
    }
}

fn is_base64(payload: &Value) -> bool {
    payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_gateway_string_body() {
        let event = json!({
            "httpMethod": "POST",
            "path": "/chat",
            "body": "{\"prompt\": \"Hello!\", \"model\": \"nova-pro\"}",
            "isBase64Encoded": false
        });
        let req = parse_event(&event, "nova-lite").unwrap();
        assert_eq!(req.prompt, "Hello!");
        assert_eq!(req.model, "nova-pro");
    }

    #[test]
    fn api_gateway_base64_body() {
        // {"prompt": "Hi"}
        let event = json!({
            "body": "eyJwcm9tcHQiOiAiSGkifQ==",
            "isBase64Encoded": true
        });
        let req = parse_event(&event, "nova-lite").unwrap();
        assert_eq!(req.prompt, "Hi");
    }

    #[test]
    fn direct_invocation_payload() {
        let event = json!({ "prompt": "Hello!", "sessionId": "smoke" });
        let req = parse_event(&event, "nova-lite").unwrap();
        assert_eq!(req.prompt, "Hello!");
        assert_eq!(req.session_id, "smoke");
        assert_eq!(req.model, "nova-lite");
    }

    #[test]
    fn object_body_accepted() {
        let event = json!({ "body": { "prompt": "Hello!" } });
        let req = parse_event(&event, "nova-lite").unwrap();
        assert_eq!(req.prompt, "Hello!");
    }

    #[test]
    fn missing_prompt_surfaces_typed_error() {
        let event = json!({ "body": "{\"sessionId\": \"abc\"}" });
        let err = parse_event(&event, "nova-lite").unwrap_err();
        assert!(matches!(err, ChatError::MissingPrompt));
    }

    #[test]
    fn bad_base64_is_internal_error() {
        let event = json!({ "body": "!!!not-base64!!!", "isBase64Encoded": true });
        let err = parse_event(&event, "nova-lite").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
