// Bedrock model registry
//
// Static table of the models the relay can invoke. Pricing is per 1K tokens
// (USD, on-demand) and only feeds the estimated-cost field of the response
// envelope; billing truth lives in Cost Explorer.

use serde::{Deserialize, Serialize};

/// Model family, which dictates the request/response wire shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Nova,
    Claude,
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelFamily::Nova => write!(f, "nova"),
            ModelFamily::Claude => write!(f, "claude"),
        }
    }
}

/// A model the relay knows how to invoke
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    /// Short key used in requests and metric dimensions (e.g. "nova-lite")
    pub key: &'static str,
    /// Bedrock model identifier (inference profile id)
    pub model_id: &'static str,
    /// Human-readable name for response envelopes
    pub display_name: &'static str,
    pub family: ModelFamily,
    /// USD per 1K input tokens
    pub input_cost_per_1k: f64,
    /// USD per 1K output tokens
    pub output_cost_per_1k: f64,
}

/// All models the relay accepts; the first entry is a sensible default
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        key: "nova-lite",
        model_id: "us.amazon.nova-lite-v1:0",
        display_name: "Amazon Nova Lite",
        family: ModelFamily::Nova,
        input_cost_per_1k: 0.000_06,
        output_cost_per_1k: 0.000_24,
    },
    ModelSpec {
        key: "nova-pro",
        model_id: "us.amazon.nova-pro-v1:0",
        display_name: "Amazon Nova Pro",
        family: ModelFamily::Nova,
        input_cost_per_1k: 0.000_8,
        output_cost_per_1k: 0.003_2,
    },
    ModelSpec {
        key: "claude-sonnet",
        model_id: "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
        display_name: "Claude 3.5 Sonnet",
        family: ModelFamily::Claude,
        input_cost_per_1k: 0.003,
        output_cost_per_1k: 0.015,
    },
    ModelSpec {
        key: "claude-haiku",
        model_id: "us.anthropic.claude-3-haiku-20240307-v1:0",
        display_name: "Claude 3 Haiku",
        family: ModelFamily::Claude,
        input_cost_per_1k: 0.000_25,
        output_cost_per_1k: 0.001_25,
    },
];

/// Look up a model by its short key
pub fn lookup(key: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|m| m.key == key)
}

/// Valid model keys, for error messages
pub fn model_keys() -> Vec<&'static str> {
    MODELS.iter().map(|m| m.key).collect()
}
