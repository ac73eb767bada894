// prompt2text CLI: deploy the Bedrock chat Lambda and smoke-test it.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prompt2text::deploy::{self, aws::AwsControlPlane, package, ControlPlane, DeployPlan};
use prompt2text_config::RuntimeConfig;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prompt2text", version, about = "Deploy tooling for the prompt2text Bedrock Lambda")]
struct Cli {
    /// TOML config file (defaults to ./prompt2text.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the execution role if needed, deploy the function, smoke-test it
    Deploy {
        /// Lambda artifact: a prebuilt .zip or a bare bootstrap binary
        #[arg(long, value_name = "FILE")]
        artifact: PathBuf,

        /// Override the configured function name
        #[arg(long)]
        function_name: Option<String>,

        /// Override the configured AWS region
        #[arg(long)]
        region: Option<String>,

        /// Skip the post-deploy smoke invocation
        #[arg(long)]
        skip_smoke_test: bool,
    },
    /// Invoke the deployed function once and print the raw response
    Invoke {
        /// Prompt to send (defaults to the configured smoke prompt)
        #[arg(long)]
        prompt: Option<String>,

        /// Override the configured function name
        #[arg(long)]
        function_name: Option<String>,

        /// Override the configured AWS region
        #[arg(long)]
        region: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)?,
        None => RuntimeConfig::load()?,
    };

    match cli.command {
        Commands::Deploy {
            artifact,
            function_name,
            region,
            skip_smoke_test,
        } => {
            if let Some(name) = function_name {
                config.deploy.function_name = name;
            }
            if let Some(region) = region {
                config.deploy.region = region;
            }

            let artifact = package::artifact_bytes(&artifact)?;
            let plan = DeployPlan::from_config(&config.deploy, artifact, !skip_smoke_test);
            let control_plane = AwsControlPlane::connect(&config.deploy.region).await;

            let report = deploy::run(&plan, &control_plane).await?;
            println!("Function: {}", plan.function_name);
            println!(
                "Role:     {} ({})",
                report.role_arn,
                if report.created_role { "created" } else { "existing" }
            );
            println!(
                "Code:     {}",
                if report.created_function { "created" } else { "updated" }
            );
            if let Some(response) = report.smoke_response {
                println!("Smoke response:\n{response}");
            }
            Ok(())
        }
        Commands::Invoke {
            prompt,
            function_name,
            region,
        } => {
            if let Some(name) = function_name {
                config.deploy.function_name = name;
            }
            if let Some(region) = region {
                config.deploy.region = region;
            }

            let payload = json!({
                "prompt": prompt.unwrap_or_else(|| config.deploy.smoke_prompt.clone())
            })
            .to_string();
            let control_plane = AwsControlPlane::connect(&config.deploy.region).await;
            let outcome = control_plane
                .invoke(&config.deploy.function_name, &payload)
                .await?;
            if let Some(kind) = outcome.function_error {
                bail!("Function error ({kind}): {}", outcome.payload);
            }
            println!("{}", outcome.payload);
            Ok(())
        }
    }
}
