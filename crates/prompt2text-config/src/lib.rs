// prompt2text-config - Unified configuration for the relay and deploy tool
//
// Supports configuration from multiple sources:
// 1. Environment variables (PROMPT2TEXT_* prefix, highest priority)
// 2. Config file path from PROMPT2TEXT_CONFIG env var
// 3. Config file contents from PROMPT2TEXT_CONFIG_CONTENT env var
// 4. Default config file locations (./prompt2text.toml, ./.prompt2text.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub mod env_overrides;
mod sources;
mod validation;

/// Main runtime configuration, shared by the Lambda handler and the CLI
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub chat: ChatConfig,
    pub memory: MemoryConfig,
    pub metrics: MetricsConfig,
    pub retry: RetryConfig,
    pub deploy: DeployConfig,
}

/// Chat handler configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model key used when the request names none
    pub default_model: String,
    /// max_tokens / max_new_tokens passed to the model
    pub max_tokens: u32,
    /// Requests with longer prompts are rejected with a 400
    pub max_prompt_chars: usize,
    /// Use invoke_model_with_response_stream instead of invoke_model
    pub streaming: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: "nova-lite".to_string(),
            max_tokens: 1000,
            max_prompt_chars: 10_000,
            streaming: true,
        }
    }
}

/// Conversation memory (DynamoDB sessions table)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub enabled: bool,
    pub table_name: String,
    /// Number of prior exchanges loaded as context
    pub max_turns: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            table_name: "chat-sessions".to_string(),
            max_turns: 10,
        }
    }
}

/// Custom CloudWatch metrics
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "Prompt2Text".to_string(),
        }
    }
}

/// Retry and circuit-breaker settings for model invocations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
    /// Consecutive failures before the breaker opens
    pub breaker_threshold: u32,
    /// Seconds the breaker stays open before a trial call
    pub breaker_cooldown_secs: u64,
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_secs(self.initial_backoff_secs)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_secs: 1,
            max_backoff_secs: 16,
            breaker_threshold: 5,
            breaker_cooldown_secs: 60,
        }
    }
}

/// Deployment target settings consumed by the CLI
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub function_name: String,
    pub region: String,
    pub role_name: String,
    /// Inline policy name for Bedrock invoke permission
    pub inline_policy_name: String,
    pub runtime: String,
    pub handler: String,
    pub architecture: String,
    pub memory_mb: i32,
    pub timeout_secs: i32,
    /// Fixed wait after IAM mutations. Role/policy propagation is eventually
    /// consistent; creating the function immediately can fail to assume the
    /// role on first invocation.
    pub propagation_wait_secs: u64,
    /// Prompt used for the post-deploy smoke invocation
    pub smoke_prompt: String,
}

impl DeployConfig {
    pub fn propagation_wait(&self) -> Duration {
        Duration::from_secs(self.propagation_wait_secs)
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            function_name: "prompt2text".to_string(),
            region: "us-east-2".to_string(),
            role_name: "prompt2text-execution-role".to_string(),
            inline_policy_name: "bedrock-invoke".to_string(),
            runtime: "provided.al2023".to_string(),
            handler: "bootstrap".to_string(),
            architecture: "arm64".to_string(),
            memory_mb: 128,
            timeout_secs: 30,
            propagation_wait_secs: 10,
            smoke_prompt: "Hello! Tell me about AWS Bedrock in one sentence.".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for the CLI --config flag)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RuntimeConfig::default();
        config.validate().unwrap();

        assert_eq!(config.chat.default_model, "nova-lite");
        assert_eq!(config.chat.max_tokens, 1000);
        assert_eq!(config.memory.table_name, "chat-sessions");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.deploy.runtime, "provided.al2023");
        assert_eq!(config.deploy.propagation_wait(), Duration::from_secs(10));
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [chat]
            default_model = "claude-haiku"
            streaming = false

            [deploy]
            function_name = "my-assistant"
            memory_mb = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.default_model, "claude-haiku");
        assert!(!config.chat.streaming);
        assert_eq!(config.deploy.function_name, "my-assistant");
        assert_eq!(config.deploy.memory_mb, 256);
        // Untouched sections keep their defaults
        assert_eq!(config.memory.max_turns, 10);
        assert_eq!(config.deploy.timeout_secs, 30);
    }
}
