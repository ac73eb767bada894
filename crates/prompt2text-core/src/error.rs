//! Error types for response decoding

use thiserror::Error;

/// Errors produced while decoding a model response or stream chunk
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload was not valid JSON
    #[error("model response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but no text content was found in any known shape
    #[error("model response contained no text content")]
    MissingText,
}
