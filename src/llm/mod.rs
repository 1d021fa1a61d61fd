//! Generative-text collaborator.
//!
//! Trait-based abstraction over the language model used for quote
//! generation, with the Anthropic Messages API as the primary
//! implementation. Each call is a single request/response pair; retry
//! policy lives with the caller, not the client.

mod anthropic;

pub use anthropic::AnthropicClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single generative-text call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse API response: {0}")]
    Parse(String),

    #[error("model returned no text content")]
    EmptyResponse,
}

/// Trait for generative-text clients.
///
/// Implementations send one system instruction plus one user message
/// and return the model's text output.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}
