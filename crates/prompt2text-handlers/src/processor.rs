//! The chat pipeline
//!
//! validate -> load history (best effort) -> build request -> invoke model
//! with retry + circuit breaker -> usage accounting -> save history (best
//! effort) -> metrics (best effort) -> reply envelope.
//!
//! Remote services sit behind `ModelClient`, `HistoryStore`, and
//! `MetricsSink`; the Lambda crate provides the AWS-backed implementations.

use crate::breaker::CircuitBreaker;
use crate::error::ChatError;
use crate::reply::{ChatReply, Performance};
use crate::request::ChatRequest;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use prompt2text_config::{ChatConfig, RetryConfig};
use prompt2text_core::{
    build_transcript, model_keys, request::build_request_body, usage, ModelSpec, Turn, Usage,
};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// One completed exchange to persist
#[derive(Debug, Clone)]
pub struct Exchange {
    pub prompt: String,
    pub reply: String,
    pub cost: f64,
}

/// Generates text from a request body for a given model
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, spec: &ModelSpec, request_body: Vec<u8>) -> Result<String, ChatError>;
}

/// Conversation history persistence
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Most recent turns for a session, oldest first
    async fn recent(&self, session_id: &str, max_turns: usize) -> Result<Vec<Turn>, ChatError>;

    /// Persist a completed exchange
    async fn append(
        &self,
        session_id: &str,
        model_key: &str,
        exchange: &Exchange,
    ) -> Result<(), ChatError>;
}

/// Custom metrics publication; implementations swallow their own failures
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn record_request(&self, model_key: &str, usage: &Usage, model_duration: Duration);
    async fn record_error(&self, model_key: &str);
}

pub struct ChatProcessor<M, H, S> {
    chat: ChatConfig,
    retry: RetryPolicy,
    breaker: Mutex<CircuitBreaker>,
    model_client: M,
    /// None when conversation memory is disabled
    history: Option<H>,
    /// None when custom metrics are disabled
    metrics: Option<S>,
    max_turns: usize,
}

impl<M, H, S> ChatProcessor<M, H, S>
where
    M: ModelClient,
    H: HistoryStore,
    S: MetricsSink,
{
    pub fn new(
        chat: ChatConfig,
        retry_config: &RetryConfig,
        model_client: M,
        history: Option<H>,
        metrics: Option<S>,
        max_turns: usize,
    ) -> Self {
        Self {
            chat,
            retry: RetryPolicy::from_config(retry_config),
            breaker: Mutex::new(CircuitBreaker::new(
                retry_config.breaker_threshold,
                retry_config.breaker_cooldown(),
            )),
            model_client,
            history,
            metrics,
            max_turns,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.chat.default_model
    }

    /// Run one request through the full pipeline
    pub async fn process(&self, req: ChatRequest) -> Result<ChatReply, ChatError> {
        let start = Instant::now();

        if req.prompt.len() > self.chat.max_prompt_chars {
            return Err(ChatError::PromptTooLong {
                length: req.prompt.len(),
                limit: self.chat.max_prompt_chars,
            });
        }

        let spec = prompt2text_core::lookup(&req.model).ok_or_else(|| ChatError::UnknownModel {
            key: req.model.clone(),
            valid: model_keys(),
        })?;

        // History is context, not correctness: a failed load degrades to an
        // empty transcript instead of failing the request.
        let history = match &self.history {
            Some(store) => match store.recent(&req.session_id, self.max_turns).await {
                Ok(turns) => turns,
                Err(err) => {
                    warn!(session_id = %req.session_id, error = %err, "failed to load history");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let transcript = build_transcript(&history, &req.prompt);
        let body = build_request_body(spec, &transcript, self.chat.max_tokens);
        let body_bytes = serde_json::to_vec(&body)
            .map_err(|e| ChatError::Internal(format!("failed to encode request body: {}", e)))?;

        let model_start = Instant::now();
        let text = match self.generate_with_retry(spec, body_bytes).await {
            Ok(text) => text,
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(spec.key).await;
                }
                return Err(err);
            }
        };
        let model_duration = model_start.elapsed();

        let input_text: String = history
            .iter()
            .map(|t| t.text.as_str())
            .chain([req.prompt.as_str()])
            .collect();
        let usage = usage::measure(spec, &input_text, &text);

        let mut warning = None;
        if let Some(store) = &self.history {
            let exchange = Exchange {
                prompt: req.prompt.clone(),
                reply: text.clone(),
                cost: usage.estimated_cost,
            };
            if let Err(err) = store.append(&req.session_id, spec.key, &exchange).await {
                warn!(session_id = %req.session_id, error = %err, "failed to save exchange");
                warning =
                    Some("Reply delivered, but this exchange was not saved to history".to_string());
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_request(spec.key, &usage, model_duration).await;
        }

        info!(
            session_id = %req.session_id,
            model = spec.key,
            cost = usage.estimated_cost,
            duration_secs = start.elapsed().as_secs_f64(),
            "request completed"
        );

        Ok(ChatReply {
            success: true,
            session_id: req.session_id,
            prompt: req.prompt,
            response: text,
            model: spec.display_name.to_string(),
            model_key: spec.key.to_string(),
            conversation_length: history.len() + 1,
            usage,
            performance: Performance {
                model_duration: model_duration.as_secs_f64(),
                total_duration: start.elapsed().as_secs_f64(),
            },
            warning,
        })
    }

    async fn generate_with_retry(
        &self,
        spec: &ModelSpec,
        body: Vec<u8>,
    ) -> Result<String, ChatError> {
        let mut attempt = 0u32;
        loop {
            if !self.lock_breaker().allow() {
                return Err(ChatError::ModelUnavailable);
            }

            match self.model_client.generate(spec, body.clone()).await {
                Ok(text) => {
                    self.lock_breaker().record_success();
                    return Ok(text);
                }
                Err(err) if err.retryable() && attempt + 1 < self.retry.max_attempts => {
                    let wait = self.retry.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        wait_secs = wait.as_secs_f64(),
                        error = %err,
                        "model invocation failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    self.lock_breaker().record_failure();
                    return Err(err);
                }
            }
        }
    }

    fn lock_breaker(&self) -> std::sync::MutexGuard<'_, CircuitBreaker> {
        self.breaker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
