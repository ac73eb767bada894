// AWS Lambda binary entry point
//
// Built as `bootstrap` for the provided.al2023 runtime:
//   cargo build -p prompt2text-lambda --release --target aarch64-unknown-linux-gnu
//
// The lambda_runtime crate provides the tokio runtime, so we use #[tokio::main]

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    prompt2text_lambda::run().await
}
