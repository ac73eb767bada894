// CloudWatch custom metrics adapter
//
// Publishes the numbers the cost dashboard reads: RequestCount,
// EstimatedCost, ModelDuration, and Errors, each with a Model dimension.
// Metrics are best effort; a failed put is logged and swallowed so it can
// never fail a user request.

use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use aws_sdk_cloudwatch::Client;
use prompt2text_core::Usage;
use prompt2text_handlers::MetricsSink;
use std::time::{Duration, SystemTime};
use tracing::warn;

pub struct CloudWatchMetricsSink {
    client: Client,
    namespace: String,
}

impl CloudWatchMetricsSink {
    pub fn new(client: Client, namespace: String) -> Self {
        Self { client, namespace }
    }

    fn datum(name: &str, model_key: &str, value: f64, unit: StandardUnit) -> MetricDatum {
        MetricDatum::builder()
            .metric_name(name)
            .value(value)
            .unit(unit)
            .dimensions(Dimension::builder().name("Model").value(model_key).build())
            .timestamp(DateTime::from(SystemTime::now()))
            .build()
    }

    async fn put(&self, data: Vec<MetricDatum>) {
        let result = self
            .client
            .put_metric_data()
            .namespace(&self.namespace)
            .set_metric_data(Some(data))
            .send()
            .await;
        if let Err(e) = result {
            warn!(error = %DisplayErrorContext(&e), "failed to publish metrics");
        }
    }
}

#[async_trait]
impl MetricsSink for CloudWatchMetricsSink {
    async fn record_request(&self, model_key: &str, usage: &Usage, model_duration: Duration) {
        self.put(vec![
            Self::datum("RequestCount", model_key, 1.0, StandardUnit::Count),
            Self::datum(
                "EstimatedCost",
                model_key,
                usage.estimated_cost,
                StandardUnit::None,
            ),
            Self::datum(
                "ModelDuration",
                model_key,
                model_duration.as_secs_f64(),
                StandardUnit::Seconds,
            ),
        ])
        .await;
    }

    async fn record_error(&self, model_key: &str) {
        self.put(vec![Self::datum(
            "Errors",
            model_key,
            1.0,
            StandardUnit::Count,
        )])
        .await;
    }
}
