// src/llm/provider.rs
// Generator abstraction so the companion can run against any chat backend

use anyhow::Result;
use async_trait::async_trait;

use super::{ChatResult, Message};

/// Trait for text-generation backends
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request (one attempt, no retries)
    async fn chat(&self, messages: Vec<Message>) -> Result<ChatResult>;

    /// Model identifier, for logging
    fn model_name(&self) -> String;
}
