// Deployment sequence tests against an in-memory control plane.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use prompt2text::deploy::{self, ControlPlane, DeployPlan, InvokeOutcome};
use prompt2text_config::DeployConfig;

#[derive(Default)]
struct RecordingControlPlane {
    role_exists: bool,
    function_exists: bool,
    fail_step: Option<&'static str>,
    function_error: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingControlPlane {
    fn record(&self, step: &str) -> Result<()> {
        self.calls.lock().unwrap().push(step.to_string());
        if self.fail_step == Some(step) {
            bail!("injected failure in {step}");
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlPlane for RecordingControlPlane {
    async fn role_arn(&self, _role_name: &str) -> Result<Option<String>> {
        self.record("role_arn")?;
        Ok(self
            .role_exists
            .then(|| "arn:aws:iam::123456789012:role/existing".to_string()))
    }

    async fn create_role(&self, role_name: &str, trust_policy: &str) -> Result<String> {
        assert!(trust_policy.contains("lambda.amazonaws.com"));
        self.record("create_role")?;
        Ok(format!("arn:aws:iam::123456789012:role/{role_name}"))
    }

    async fn attach_managed_policy(&self, _role_name: &str, policy_arn: &str) -> Result<()> {
        assert!(policy_arn.ends_with("AWSLambdaBasicExecutionRole"));
        self.record("attach_managed_policy")
    }

    async fn put_inline_policy(
        &self,
        _role_name: &str,
        _policy_name: &str,
        policy_document: &str,
    ) -> Result<()> {
        assert!(policy_document.contains("bedrock:InvokeModel"));
        self.record("put_inline_policy")
    }

    async fn function_exists(&self, _function_name: &str) -> Result<bool> {
        self.record("function_exists")?;
        Ok(self.function_exists)
    }

    async fn create_function(&self, _plan: &DeployPlan, role_arn: &str) -> Result<()> {
        assert!(role_arn.starts_with("arn:aws:iam::"));
        self.record("create_function")
    }

    async fn update_function_code(&self, _function_name: &str, artifact: &[u8]) -> Result<()> {
        assert!(!artifact.is_empty());
        self.record("update_function_code")
    }

    async fn invoke(&self, _function_name: &str, payload: &str) -> Result<InvokeOutcome> {
        assert!(payload.contains("prompt"));
        self.record("invoke")?;
        Ok(InvokeOutcome {
            payload: r#"{"statusCode":200}"#.to_string(),
            function_error: self.function_error.clone(),
        })
    }
}

fn test_plan(smoke_test: bool) -> DeployPlan {
    let mut plan = DeployPlan::from_config(&DeployConfig::default(), vec![0x50, 0x4b], smoke_test);
    // No real IAM involved, so no need to wait in tests
    plan.propagation_wait = Duration::ZERO;
    plan
}

#[tokio::test]
async fn fresh_deploy_creates_role_and_function_in_order() {
    let control_plane = RecordingControlPlane::default();

    let report = deploy::run(&test_plan(true), &control_plane).await.unwrap();

    assert!(report.created_role);
    assert!(report.created_function);
    assert_eq!(report.smoke_response.as_deref(), Some(r#"{"statusCode":200}"#));
    assert_eq!(
        control_plane.calls(),
        [
            "role_arn",
            "create_role",
            "attach_managed_policy",
            "put_inline_policy",
            "function_exists",
            "create_function",
            "invoke",
        ]
    );
}

#[tokio::test]
async fn rerun_skips_creation_and_only_updates_code() {
    let control_plane = RecordingControlPlane {
        role_exists: true,
        function_exists: true,
        ..Default::default()
    };

    let report = deploy::run(&test_plan(true), &control_plane).await.unwrap();

    assert!(!report.created_role);
    assert!(!report.created_function);
    assert_eq!(report.role_arn, "arn:aws:iam::123456789012:role/existing");
    assert_eq!(
        control_plane.calls(),
        [
            "role_arn",
            "attach_managed_policy",
            "put_inline_policy",
            "function_exists",
            "update_function_code",
            "invoke",
        ]
    );
}

#[tokio::test]
async fn existing_role_with_missing_function_still_creates_function() {
    let control_plane = RecordingControlPlane {
        role_exists: true,
        ..Default::default()
    };

    let report = deploy::run(&test_plan(true), &control_plane).await.unwrap();

    assert!(!report.created_role);
    assert!(report.created_function);
    assert!(control_plane.calls().contains(&"create_function".to_string()));
    assert!(!control_plane.calls().contains(&"create_role".to_string()));
}

#[tokio::test]
async fn skip_smoke_test_does_not_invoke() {
    let control_plane = RecordingControlPlane::default();

    let report = deploy::run(&test_plan(false), &control_plane).await.unwrap();

    assert!(report.smoke_response.is_none());
    assert!(!control_plane.calls().contains(&"invoke".to_string()));
}

#[tokio::test]
async fn failed_permission_step_aborts_before_touching_the_function() {
    let control_plane = RecordingControlPlane {
        role_exists: true,
        fail_step: Some("attach_managed_policy"),
        ..Default::default()
    };

    let err = deploy::run(&test_plan(true), &control_plane)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("AWSLambdaBasicExecutionRole"));
    assert_eq!(control_plane.calls(), ["role_arn", "attach_managed_policy"]);
}

#[tokio::test]
async fn smoke_function_error_fails_the_run() {
    let control_plane = RecordingControlPlane {
        role_exists: true,
        function_exists: true,
        function_error: Some("Unhandled".to_string()),
        ..Default::default()
    };

    let err = deploy::run(&test_plan(true), &control_plane)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Unhandled"));
}

#[test]
fn smoke_payload_carries_the_configured_prompt() {
    let config = DeployConfig::default();
    let plan = DeployPlan::from_config(&config, vec![1], true);
    let payload = plan.smoke_payload.unwrap();
    assert!(payload.contains(&config.smoke_prompt));

    let silent = DeployPlan::from_config(&config, vec![1], false);
    assert!(silent.smoke_payload.is_none());
}
