//! Shared chat pipeline and error handling for the prompt2text relay
//!
//! This crate owns everything between "a JSON body arrived" and "a reply
//! envelope is ready": request parsing, validation, retry with exponential
//! backoff, circuit breaking, conversation memory, usage accounting, and
//! error classification. Remote services (Bedrock, DynamoDB, CloudWatch)
//! sit behind traits so the whole pipeline is testable without AWS.

pub mod breaker;
pub mod error;
pub mod processor;
pub mod reply;
pub mod request;
pub mod retry;

pub use breaker::CircuitBreaker;
pub use error::ChatError;
pub use processor::{ChatProcessor, Exchange, HistoryStore, MetricsSink, ModelClient};
pub use reply::{ChatReply, ErrorReply};
pub use request::ChatRequest;
pub use retry::RetryPolicy;
