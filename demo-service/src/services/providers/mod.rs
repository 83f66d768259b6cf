//! Text generation providers.
//!
//! The greeting endpoint talks to a [`TextGenerator`]; which backend sits
//! behind it is decided at startup (Ollama in deployments, mock in tests).

pub mod mock;
pub mod ollama;

pub use mock::MockTextGenerator;
pub use ollama::OllamaTextGenerator;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Timeout => "timeout",
            GenerationError::Network(_) => "network",
            GenerationError::Api { .. } => "api",
            GenerationError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Turns one prompt into one piece of generated text.
///
/// No streaming and no conversation history: every call stands alone.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name used as a metrics label.
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), GenerationError>;
}
