// Environment variable overrides
//
// Every override lives under the PROMPT2TEXT_ prefix. The EnvSource trait
// exists so tests can supply variables without touching the process
// environment. get_raw reads unprefixed variables (AWS_REGION).

use crate::RuntimeConfig;
use anyhow::{Context, Result};

pub const ENV_PREFIX: &str = "PROMPT2TEXT_";

/// Source of environment variables, injectable for tests
pub trait EnvSource {
    /// Read a PROMPT2TEXT_-prefixed variable by suffix
    fn get(&self, key: &str) -> Option<String>;

    /// Read an unprefixed variable verbatim
    fn get_raw(&self, key: &str) -> Option<String>;
}

pub fn apply_env_overrides(config: &mut RuntimeConfig, env: &dyn EnvSource) -> Result<()> {
    if let Some(model) = env.get("DEFAULT_MODEL") {
        config.chat.default_model = model;
    }
    if let Some(value) = env.get("MAX_TOKENS") {
        config.chat.max_tokens = parse(&value, "PROMPT2TEXT_MAX_TOKENS")?;
    }
    if let Some(value) = env.get("STREAMING") {
        config.chat.streaming = parse_bool(&value, "PROMPT2TEXT_STREAMING")?;
    }

    if let Some(value) = env.get("MEMORY_ENABLED") {
        config.memory.enabled = parse_bool(&value, "PROMPT2TEXT_MEMORY_ENABLED")?;
    }
    if let Some(table) = env.get("TABLE_NAME") {
        config.memory.table_name = table;
    }
    if let Some(value) = env.get("MAX_TURNS") {
        config.memory.max_turns = parse(&value, "PROMPT2TEXT_MAX_TURNS")?;
    }

    if let Some(value) = env.get("METRICS_ENABLED") {
        config.metrics.enabled = parse_bool(&value, "PROMPT2TEXT_METRICS_ENABLED")?;
    }
    if let Some(namespace) = env.get("METRICS_NAMESPACE") {
        config.metrics.namespace = namespace;
    }

    if let Some(value) = env.get("RETRY_MAX_ATTEMPTS") {
        config.retry.max_attempts = parse(&value, "PROMPT2TEXT_RETRY_MAX_ATTEMPTS")?;
    }

    if let Some(name) = env.get("FUNCTION_NAME") {
        config.deploy.function_name = name;
    }
    // Explicit prefix wins over the ambient AWS_REGION
    if let Some(region) = env.get("REGION").or_else(|| env.get_raw("AWS_REGION")) {
        config.deploy.region = region;
    }

    Ok(())
}

fn parse<T: std::str::FromStr>(value: &str, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: {}", name, value))
}

fn parse_bool(value: &str, name: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Invalid boolean for {}: {}", name, other),
    }
}
