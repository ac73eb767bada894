//! AWS-backed implementations of the pipeline seams

pub mod bedrock;
pub mod dynamo;
pub mod metrics;
