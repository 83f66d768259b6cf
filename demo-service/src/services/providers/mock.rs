//! Mock provider for tests and offline runs.

use super::{GenerationError, TextGenerator};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does when asked to generate.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this text.
    Reply(String),
    /// Sleep first, then return the text.
    SlowReply(Duration, String),
    /// Fail with an API error carrying this message.
    Fail(String),
}

/// Mock text generator that records every prompt it receives.
pub struct MockTextGenerator {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::SlowReply(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
            MockBehavior::Fail(message) => Err(GenerationError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        match &self.behavior {
            MockBehavior::Fail(message) => Err(GenerationError::Network(message.clone())),
            _ => Ok(()),
        }
    }
}
