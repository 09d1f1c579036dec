pub mod chat;
pub mod types;

pub use chat::ChatCompletionClient;

use crate::prompt::Prompt;

/// Completion backend abstraction - one single-turn request per prompt
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate text for `prompt`, capped at `max_tokens`
    async fn complete(&self, prompt: &Prompt, max_tokens: u32) -> Result<String, CompletionError>;
}

/// Completion-related errors
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport failure, timeout, error status or undecodable body
    #[error("completion unavailable: {0}")]
    Unavailable(String),

    /// The request succeeded but carried no usable text
    #[error("completion returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Unavailable(format!("request timed out: {err}"))
        } else {
            CompletionError::Unavailable(err.to_string())
        }
    }
}
