// API Gateway proxy response builders
//
// Every reply, success or error, goes out as JSON with permissive CORS
// headers so the static web client can call the endpoint directly.

use aws_lambda_events::{
    apigw::ApiGatewayProxyResponse,
    encodings::Body,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue},
};
use prompt2text_handlers::{ChatError, ErrorReply};
use serde_json::{json, Value};

pub(crate) fn json_response(status_code: u16, body: Value) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code: status_code as i64,
        headers: Default::default(),
        multi_value_headers: Default::default(),
        body: Some(Body::Text(body.to_string())),
        is_base64_encoded: false,
    };
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    response.headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("Content-Type,x-api-key"),
    );
    response.headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("OPTIONS,POST,GET"),
    );
    response
}

pub(crate) fn error_response(err: &ChatError) -> ApiGatewayProxyResponse {
    let reply = ErrorReply::from_error(err);
    let body = serde_json::to_value(&reply)
        .unwrap_or_else(|_| json!({ "success": false, "error": err.to_string() }));
    json_response(err.status_code(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_has_cors_headers() {
        let response = json_response(200, json!({ "success": true }));
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        match response.body {
            Some(Body::Text(text)) => assert!(text.contains("success")),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn error_response_uses_error_status() {
        let response = error_response(&ChatError::MissingPrompt);
        assert_eq!(response.status_code, 400);
        match response.body {
            Some(Body::Text(text)) => {
                assert!(text.contains("MissingPrompt"));
                assert!(text.contains("\"success\":false"));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
