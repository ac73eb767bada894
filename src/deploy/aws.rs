// AWS SDK implementation of the deploy control plane.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Architecture, FunctionCode, Runtime};
use tracing::debug;

use super::{ControlPlane, DeployPlan, InvokeOutcome};

pub struct AwsControlPlane {
    iam: aws_sdk_iam::Client,
    lambda: aws_sdk_lambda::Client,
}

impl AwsControlPlane {
    /// Builds IAM and Lambda clients from the ambient credential chain.
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        debug!(region, "AWS clients initialized");
        Self {
            iam: aws_sdk_iam::Client::new(&config),
            lambda: aws_sdk_lambda::Client::new(&config),
        }
    }
}

#[async_trait]
impl ControlPlane for AwsControlPlane {
    async fn role_arn(&self, role_name: &str) -> Result<Option<String>> {
        match self.iam.get_role().role_name(role_name).send().await {
            Ok(output) => Ok(output.role().map(|role| role.arn().to_string())),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_entity_exception() {
                    Ok(None)
                } else {
                    Err(anyhow!("{}", DisplayErrorContext(&service_err)))
                }
            }
        }
    }

    async fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<String> {
        let output = self
            .iam
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        let arn = output
            .role()
            .map(|role| role.arn().to_string())
            .context("CreateRole response carried no role")?;
        Ok(arn)
    }

    async fn attach_managed_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.iam
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(())
    }

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<()> {
        self.iam
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(())
    }

    async fn function_exists(&self, function_name: &str) -> Result<bool> {
        match self
            .lambda
            .get_function()
            .function_name(function_name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    Ok(false)
                } else {
                    Err(anyhow!("{}", DisplayErrorContext(&service_err)))
                }
            }
        }
    }

    async fn create_function(&self, plan: &DeployPlan, role_arn: &str) -> Result<()> {
        let code = FunctionCode::builder()
            .zip_file(Blob::new(plan.artifact.clone()))
            .build();
        self.lambda
            .create_function()
            .function_name(&plan.function_name)
            .runtime(Runtime::from(plan.runtime.as_str()))
            .handler(&plan.handler)
            .role(role_arn)
            .code(code)
            .architectures(Architecture::from(plan.architecture.as_str()))
            .memory_size(plan.memory_mb)
            .timeout(plan.timeout_secs)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(())
    }

    async fn update_function_code(&self, function_name: &str, artifact: &[u8]) -> Result<()> {
        self.lambda
            .update_function_code()
            .function_name(function_name)
            .zip_file(Blob::new(artifact.to_vec()))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(())
    }

    async fn invoke(&self, function_name: &str, payload: &str) -> Result<InvokeOutcome> {
        let output = self
            .lambda
            .invoke()
            .function_name(function_name)
            .payload(Blob::new(payload.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        let payload = output
            .payload()
            .map(|blob| String::from_utf8_lossy(blob.as_ref()).into_owned())
            .unwrap_or_default();
        Ok(InvokeOutcome {
            payload,
            function_error: output.function_error().map(str::to_string),
        })
    }
}
