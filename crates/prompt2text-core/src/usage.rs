// Token and cost estimation
//
// The chars/4 heuristic is deliberately rough; it feeds the response
// envelope and the EstimatedCost metric, not billing. Costs are rounded to
// six decimal places to keep the envelope readable.

use crate::model::ModelSpec;
use serde::Serialize;

/// Estimated token usage and cost for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_cost: f64,
}

/// Rough token count: roughly four characters per token
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() / 4) as u64
}

/// Estimated USD cost for a request, rounded to 6 decimal places
pub fn estimate_cost(spec: &ModelSpec, input_tokens: u64, output_tokens: u64) -> f64 {
    let input = (input_tokens as f64 / 1000.0) * spec.input_cost_per_1k;
    let output = (output_tokens as f64 / 1000.0) * spec.output_cost_per_1k;
    round6(input + output)
}

/// Measure a full exchange: prompt plus history context in, reply out
pub fn measure(spec: &ModelSpec, input_text: &str, output_text: &str) -> Usage {
    let input_tokens = estimate_tokens(input_text);
    let output_tokens = estimate_tokens(output_text);
    Usage {
        input_tokens,
        output_tokens,
        estimated_cost: estimate_cost(spec, input_tokens, output_tokens),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
