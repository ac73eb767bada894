// Streaming response assembly
//
// invoke_model_with_response_stream delivers the answer as a sequence of
// JSON chunk payloads. Nova emits camelCase contentBlockDelta events;
// Claude emits content_block_delta with a top-level delta. Chunks that
// carry no text (message start/stop, usage metadata) are counted but
// otherwise ignored.

use crate::error::DecodeError;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    chunks: usize,
}

impl StreamAccumulator {
    /// Fold one chunk payload into the accumulated text
    pub fn push_chunk(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.chunks += 1;

        let delta_text = value
            .pointer("/contentBlockDelta/delta/text")
            .or_else(|| value.pointer("/delta/text"))
            .and_then(Value::as_str);

        if let Some(t) = delta_text {
            self.text.push_str(t);
        }
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consume the accumulator, returning the assembled text
    pub fn into_text(self) -> String {
        self.text
    }
}
