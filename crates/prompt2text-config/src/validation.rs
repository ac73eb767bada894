// Configuration validation
//
// Rejects values that would break a deploy or an invocation; warns about
// values that work but are probably mistakes.

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_chat(&config.chat)?;
    validate_memory(&config.memory)?;
    validate_metrics(&config.metrics)?;
    validate_retry(&config.retry)?;
    validate_deploy(&config.deploy)?;
    Ok(())
}

fn validate_chat(config: &ChatConfig) -> Result<()> {
    if config.default_model.is_empty() {
        bail!("chat.default_model must not be empty");
    }
    if config.max_tokens == 0 {
        bail!("chat.max_tokens must be greater than 0");
    }
    if config.max_prompt_chars == 0 {
        bail!("chat.max_prompt_chars must be greater than 0");
    }
    if config.max_tokens > 100_000 {
        warn!(
            max_tokens = config.max_tokens,
            "chat.max_tokens is very large; most models cap output well below this"
        );
    }
    Ok(())
}

fn validate_memory(config: &MemoryConfig) -> Result<()> {
    if config.enabled {
        if config.table_name.is_empty() {
            bail!("memory.table_name must not be empty when memory is enabled");
        }
        if config.max_turns == 0 {
            bail!("memory.max_turns must be greater than 0 when memory is enabled");
        }
    }
    Ok(())
}

fn validate_metrics(config: &MetricsConfig) -> Result<()> {
    if config.enabled && config.namespace.is_empty() {
        bail!("metrics.namespace must not be empty when metrics are enabled");
    }
    Ok(())
}

fn validate_retry(config: &RetryConfig) -> Result<()> {
    if config.max_attempts == 0 {
        bail!("retry.max_attempts must be at least 1");
    }
    if config.max_backoff_secs < config.initial_backoff_secs {
        bail!("retry.max_backoff_secs must be >= retry.initial_backoff_secs");
    }
    if config.breaker_threshold == 0 {
        bail!("retry.breaker_threshold must be at least 1");
    }
    Ok(())
}

fn validate_deploy(config: &DeployConfig) -> Result<()> {
    if config.function_name.is_empty() {
        bail!("deploy.function_name must not be empty");
    }
    if config.region.is_empty() {
        bail!("deploy.region must not be empty");
    }
    if config.role_name.is_empty() {
        bail!("deploy.role_name must not be empty");
    }
    if config.inline_policy_name.is_empty() {
        bail!("deploy.inline_policy_name must not be empty");
    }
    if config.memory_mb < 128 {
        bail!("deploy.memory_mb must be at least 128");
    }
    if config.timeout_secs < 1 || config.timeout_secs > 900 {
        bail!("deploy.timeout_secs must be between 1 and 900");
    }
    if config.architecture != "arm64" && config.architecture != "x86_64" {
        bail!(
            "deploy.architecture must be 'arm64' or 'x86_64', got '{}'",
            config.architecture
        );
    }
    if config.propagation_wait_secs > 120 {
        warn!(
            propagation_wait_secs = config.propagation_wait_secs,
            "deploy.propagation_wait_secs is unusually long"
        );
    }
    Ok(())
}
