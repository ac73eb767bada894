// AWS Lambda runtime adapter
//
// Wires the chat pipeline to AWS: Bedrock for inference, DynamoDB for
// conversation memory, CloudWatch for custom metrics. Clients are built
// once at cold start and shared across invocations through an Arc.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use prompt2text_config::RuntimeConfig;
use prompt2text_handlers::ChatProcessor;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

mod adapters;
mod handlers;
mod response;

use adapters::bedrock::BedrockModelClient;
use adapters::dynamo::DynamoHistoryStore;
use adapters::metrics::CloudWatchMetricsSink;
use handlers::handle_event;

pub(crate) type LambdaProcessor =
    ChatProcessor<BedrockModelClient, DynamoHistoryStore, CloudWatchMetricsSink>;

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = RuntimeConfig::load().map_err(|e| Error::from(format!("{:#}", e)))?;
    info!(
        default_model = %config.chat.default_model,
        streaming = config.chat.streaming,
        memory = config.memory.enabled,
        metrics = config.metrics.enabled,
        "prompt2text handler starting"
    );

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let model_client = BedrockModelClient::new(
        aws_sdk_bedrockruntime::Client::new(&aws_config),
        config.chat.streaming,
    );
    let history = config.memory.enabled.then(|| {
        DynamoHistoryStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            config.memory.table_name.clone(),
        )
    });
    let metrics = config.metrics.enabled.then(|| {
        CloudWatchMetricsSink::new(
            aws_sdk_cloudwatch::Client::new(&aws_config),
            config.metrics.namespace.clone(),
        )
    });

    let processor: Arc<LambdaProcessor> = Arc::new(ChatProcessor::new(
        config.chat.clone(),
        &config.retry,
        model_client,
        history,
        metrics,
        config.memory.max_turns,
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let processor = processor.clone();
        async move { handle_event(event, &processor).await }
    }))
    .await
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // CloudWatch Logs ingests one JSON object per line
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time() // Lambda adds its own timestamps
        .init();
}
