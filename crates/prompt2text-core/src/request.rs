// Invocation body construction
//
// Each model family wants a different JSON shape:
//   Claude: {"anthropic_version": ..., "max_tokens": N, "messages": [{"role", "content"}]}
//   Nova:   {"messages": [{"role", "content": [{"text": ...}]}], "inferenceConfig": {"max_new_tokens": N}}

use crate::conversation::Turn;
use crate::model::{ModelFamily, ModelSpec};
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Build the invocation request body for a model
pub fn build_request_body(spec: &ModelSpec, transcript: &[Turn], max_tokens: u32) -> Value {
    let messages: Vec<Value> = transcript
        .iter()
        .map(|turn| match spec.family {
            ModelFamily::Claude => json!({
                "role": turn.role.as_str(),
                "content": turn.text,
            }),
            ModelFamily::Nova => json!({
                "role": turn.role.as_str(),
                "content": [{ "text": turn.text }],
            }),
        })
        .collect();

    match spec.family {
        ModelFamily::Claude => json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "max_tokens": max_tokens,
            "messages": messages,
        }),
        ModelFamily::Nova => json!({
            "messages": messages,
            "inferenceConfig": { "max_new_tokens": max_tokens },
        }),
    }
}
