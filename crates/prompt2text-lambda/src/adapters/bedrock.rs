// Bedrock runtime adapter
//
// Implements ModelClient over invoke_model (buffered) or
// invoke_model_with_response_stream. Service error codes are classified
// into retryable vs terminal so the processor's backoff loop knows what to
// do; errors without a code (connector failures) are treated as retryable.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::types::ResponseStream;
use aws_sdk_bedrockruntime::Client;
use prompt2text_core::{response::extract_text, ModelSpec, StreamAccumulator};
use prompt2text_handlers::{ChatError, ModelClient};
use tracing::debug;

const RETRYABLE_CODES: &[&str] = &[
    "ThrottlingException",
    "ServiceUnavailableException",
    "TooManyRequestsException",
    "ModelNotReadyException",
];

pub struct BedrockModelClient {
    client: Client,
    streaming: bool,
}

impl BedrockModelClient {
    pub fn new(client: Client, streaming: bool) -> Self {
        Self { client, streaming }
    }

    async fn generate_buffered(
        &self,
        spec: &ModelSpec,
        request_body: Vec<u8>,
    ) -> Result<String, ChatError> {
        let output = self
            .client
            .invoke_model()
            .model_id(spec.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_body))
            .send()
            .await
            .map_err(classify)?;

        extract_text(output.body().as_ref()).map_err(ChatError::from)
    }

    async fn generate_streamed(
        &self,
        spec: &ModelSpec,
        request_body: Vec<u8>,
    ) -> Result<String, ChatError> {
        let output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(spec.model_id)
            .content_type("application/json")
            .body(Blob::new(request_body))
            .send()
            .await
            .map_err(classify)?;

        let mut receiver = output.body;
        let mut accumulator = StreamAccumulator::default();
        while let Some(event) = receiver.recv().await.map_err(classify)? {
            if let ResponseStream::Chunk(part) = event {
                if let Some(bytes) = part.bytes() {
                    accumulator.push_chunk(bytes.as_ref()).map_err(ChatError::from)?;
                }
            }
        }

        debug!(chunks = accumulator.chunk_count(), "stream complete");
        if accumulator.is_empty() {
            return Err(ChatError::Decode("stream produced no text content".into()));
        }
        Ok(accumulator.into_text())
    }
}

#[async_trait]
impl ModelClient for BedrockModelClient {
    async fn generate(&self, spec: &ModelSpec, request_body: Vec<u8>) -> Result<String, ChatError> {
        if self.streaming {
            self.generate_streamed(spec, request_body).await
        } else {
            self.generate_buffered(spec, request_body).await
        }
    }
}

fn classify<E, R>(err: SdkError<E, R>) -> ChatError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let retryable = match code.as_deref() {
        Some(c) => RETRYABLE_CODES.contains(&c),
        // No service code means the request never reached the service
        None => true,
    };
    ChatError::Upstream {
        message: DisplayErrorContext(&err).to_string(),
        code,
        retryable,
    }
}
