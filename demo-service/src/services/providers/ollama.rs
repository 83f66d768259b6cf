//! Ollama chat provider.
//!
//! Sends a single non-streaming user message to `POST /api/chat` on a
//! locally running Ollama server and returns the assistant's reply.

use super::{GenerationError, TextGenerator};
use crate::config::OllamaConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Ollama text generator.
pub struct OllamaTextGenerator {
    config: OllamaConfig,
    client: Client,
}

impl OllamaTextGenerator {
    pub fn new(config: OllamaConfig, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn map_send_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Network(e.to_string())
    }
}

#[async_trait]
impl TextGenerator for OllamaTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Ollama"
        );

        let response = self
            .client
            .traced_post(&self.api_url("chat"))
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), error = %message, "Ollama returned an error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::MalformedResponse(e.to_string())
            }
        })?;

        let content = chat
            .message
            .map(|m| m.content)
            .ok_or_else(|| GenerationError::MalformedResponse("reply has no message".to_string()))?;

        tracing::debug!(
            model = %chat.model.as_deref().unwrap_or(&self.config.model),
            reply_len = content.len(),
            "Received reply from Ollama"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    /// Ollama answers `GET /api/tags` whenever the server is up.
    async fn health_check(&self) -> Result<(), GenerationError> {
        let response = self
            .client
            .traced_get(&self.api_url("tags"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GenerationError::Api {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}
