//! prompt2text-core - Model registry and Bedrock wire codecs
//!
//! Everything platform-independent lives here: which models we can talk to,
//! how to build an invocation body for each model family, how to pull the
//! generated text back out of a response (buffered or streamed), and the
//! token/cost arithmetic used for the usage envelope.
//!
//! No AWS types appear in this crate; the Lambda adapter hands us raw bytes.

pub mod conversation;
pub mod error;
pub mod model;
pub mod request;
pub mod response;
pub mod stream;
pub mod usage;

pub use conversation::{build_transcript, Role, Turn};
pub use error::DecodeError;
pub use model::{lookup, model_keys, ModelFamily, ModelSpec, MODELS};
pub use stream::StreamAccumulator;
pub use usage::Usage;
