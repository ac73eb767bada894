// DynamoDB conversation memory adapter
//
// Table shape: sessionId (S, hash key), timestamp (N millis, range key),
// role, message, model, and cost on assistant rows. recent() queries
// newest-first with a limit, then re-sorts ascending so the transcript
// reads oldest to newest.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use prompt2text_core::{Role, Turn};
use prompt2text_handlers::{ChatError, Exchange, HistoryStore};
use std::collections::HashMap;

pub struct DynamoHistoryStore {
    client: Client,
    table_name: String,
}

impl DynamoHistoryStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl HistoryStore for DynamoHistoryStore {
    async fn recent(&self, session_id: &str, max_turns: usize) -> Result<Vec<Turn>, ChatError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("sessionId = :sid")
            .expression_attribute_values(":sid", AttributeValue::S(session_id.to_string()))
            .scan_index_forward(false)
            .limit((max_turns * 2) as i32)
            .send()
            .await
            .map_err(|e| ChatError::History(DisplayErrorContext(&e).to_string()))?;

        let mut rows: Vec<(i64, Turn)> =
            output.items().iter().filter_map(turn_from_item).collect();
        rows.sort_by_key(|(ts, _)| *ts);
        Ok(rows.into_iter().map(|(_, turn)| turn).collect())
    }

    async fn append(
        &self,
        session_id: &str,
        model_key: &str,
        exchange: &Exchange,
    ) -> Result<(), ChatError> {
        let ts = chrono::Utc::now().timestamp_millis();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("sessionId", AttributeValue::S(session_id.to_string()))
            .item("timestamp", AttributeValue::N(ts.to_string()))
            .item("role", AttributeValue::S("user".to_string()))
            .item("message", AttributeValue::S(exchange.prompt.clone()))
            .item("model", AttributeValue::S(model_key.to_string()))
            .send()
            .await
            .map_err(|e| ChatError::History(DisplayErrorContext(&e).to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("sessionId", AttributeValue::S(session_id.to_string()))
            .item("timestamp", AttributeValue::N((ts + 1).to_string()))
            .item("role", AttributeValue::S("assistant".to_string()))
            .item("message", AttributeValue::S(exchange.reply.clone()))
            .item("model", AttributeValue::S(model_key.to_string()))
            .item("cost", AttributeValue::N(exchange.cost.to_string()))
            .send()
            .await
            .map_err(|e| ChatError::History(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// Decode one stored row; rows with unknown roles or missing fields are skipped
fn turn_from_item(item: &HashMap<String, AttributeValue>) -> Option<(i64, Turn)> {
    let role = Role::parse(item.get("role")?.as_s().ok()?)?;
    let text = item.get("message")?.as_s().ok()?.clone();
    let ts: i64 = item.get("timestamp")?.as_n().ok()?.parse().ok()?;
    Some((ts, Turn { role, text }))
}
