// Deployment orchestration.
//
// `run` drives a fixed, fail-fast sequence against a `ControlPlane`:
// execution role, permissions, propagation wait, function code, smoke test.
// Every step is idempotent, so re-running after a partial failure converges
// on the same deployed state.

pub mod aws;
pub mod package;
pub mod policy;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use prompt2text_config::DeployConfig;
use serde_json::json;
use tracing::info;

/// Resolved inputs for a single deploy run.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub function_name: String,
    pub role_name: String,
    pub inline_policy_name: String,
    pub runtime: String,
    pub handler: String,
    pub architecture: String,
    pub memory_mb: i32,
    pub timeout_secs: i32,
    pub propagation_wait: Duration,
    /// Zip bytes uploaded as the function code.
    pub artifact: Vec<u8>,
    /// JSON payload for the post-deploy smoke invocation; `None` skips it.
    pub smoke_payload: Option<String>,
}

impl DeployPlan {
    pub fn from_config(config: &DeployConfig, artifact: Vec<u8>, smoke_test: bool) -> Self {
        Self {
            function_name: config.function_name.clone(),
            role_name: config.role_name.clone(),
            inline_policy_name: config.inline_policy_name.clone(),
            runtime: config.runtime.clone(),
            handler: config.handler.clone(),
            architecture: config.architecture.clone(),
            memory_mb: config.memory_mb,
            timeout_secs: config.timeout_secs,
            propagation_wait: Duration::from_secs(config.propagation_wait_secs),
            artifact,
            smoke_payload: smoke_test
                .then(|| json!({ "prompt": config.smoke_prompt }).to_string()),
        }
    }
}

/// Result of a synchronous function invocation.
#[derive(Debug, Clone)]
pub struct InvokeOutcome {
    pub payload: String,
    /// Set when the function ran but raised (`Unhandled` etc.).
    pub function_error: Option<String>,
}

/// What a deploy run actually did.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub role_arn: String,
    pub created_role: bool,
    pub created_function: bool,
    pub smoke_response: Option<String>,
}

/// The IAM and Lambda operations a deploy needs. The binary backs this with
/// the AWS SDK; tests back it with an in-memory recorder.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// ARN of the role, or `None` when it does not exist.
    async fn role_arn(&self, role_name: &str) -> Result<Option<String>>;
    /// Creates the role and returns its ARN.
    async fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<String>;
    async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;
    /// Creates or overwrites the named inline policy.
    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<()>;
    async fn function_exists(&self, function_name: &str) -> Result<bool>;
    async fn create_function(&self, plan: &DeployPlan, role_arn: &str) -> Result<()>;
    async fn update_function_code(&self, function_name: &str, artifact: &[u8]) -> Result<()>;
    async fn invoke(&self, function_name: &str, payload: &str) -> Result<InvokeOutcome>;
}

/// Runs the deployment sequence. Aborts on the first failed step; no step
/// retries, since re-running the whole deploy is the recovery path.
pub async fn run(plan: &DeployPlan, control_plane: &dyn ControlPlane) -> Result<DeployReport> {
    // Execution role: create only when absent.
    let (role_arn, created_role) = match control_plane
        .role_arn(&plan.role_name)
        .await
        .context("Failed to look up execution role")?
    {
        Some(arn) => {
            info!(role = %plan.role_name, "execution role exists, skipping creation");
            (arn, false)
        }
        None => {
            info!(role = %plan.role_name, "creating execution role");
            let arn = control_plane
                .create_role(&plan.role_name, &policy::trust_policy())
                .await
                .context("Failed to create execution role")?;
            (arn, true)
        }
    };

    // Permissions are applied unconditionally: attaching an already-attached
    // managed policy is a no-op, and the inline policy overwrites in place.
    control_plane
        .attach_managed_policy(&plan.role_name, policy::LAMBDA_BASIC_EXECUTION_ARN)
        .await
        .context("Failed to attach AWSLambdaBasicExecutionRole")?;
    control_plane
        .put_inline_policy(
            &plan.role_name,
            &plan.inline_policy_name,
            &policy::bedrock_invoke_policy(),
        )
        .await
        .context("Failed to put Bedrock invoke policy")?;

    // IAM changes are eventually consistent; without this pause a freshly
    // created role can make the first create_function or invocation fail.
    if !plan.propagation_wait.is_zero() {
        info!(
            wait_secs = plan.propagation_wait.as_secs(),
            "waiting for IAM propagation"
        );
        tokio::time::sleep(plan.propagation_wait).await;
    }

    let created_function = if control_plane
        .function_exists(&plan.function_name)
        .await
        .context("Failed to look up function")?
    {
        info!(function = %plan.function_name, "function exists, updating code");
        control_plane
            .update_function_code(&plan.function_name, &plan.artifact)
            .await
            .context("Failed to update function code")?;
        false
    } else {
        info!(function = %plan.function_name, "creating function");
        control_plane
            .create_function(plan, &role_arn)
            .await
            .context("Failed to create function")?;
        true
    };

    let smoke_response = match &plan.smoke_payload {
        Some(payload) => {
            info!(function = %plan.function_name, "running smoke invocation");
            let outcome = control_plane
                .invoke(&plan.function_name, payload)
                .await
                .context("Smoke invocation failed")?;
            if let Some(kind) = outcome.function_error {
                bail!(
                    "Smoke invocation returned a function error ({kind}): {}",
                    outcome.payload
                );
            }
            Some(outcome.payload)
        }
        None => None,
    };

    Ok(DeployReport {
        role_arn,
        created_role,
        created_function,
        smoke_response,
    })
}
