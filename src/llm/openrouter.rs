// src/llm/openrouter.rs
// OpenRouter chat completions client (non-streaming)

use crate::config::LlmConfig;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::openai_compat::{ChatRequest, parse_chat_response};
use crate::llm::provider::LlmClient;
use crate::llm::{ChatResult, Message};
use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

/// Sampling temperature for every companion reply
pub const TEMPERATURE: f32 = 0.85;
/// Output cap; replies are meant to be 2-4 short sentences
pub const MAX_TOKENS: u32 = 200;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenRouter API client
pub struct OpenRouterClient {
    api_key: String,
    model: String,
    url: String,
    referer: String,
    title: String,
    http: LlmHttpClient,
}

impl OpenRouterClient {
    /// Create a client with default model, endpoint and timeout
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.into(),
            url: OPENROUTER_API_URL.into(),
            referer: "https://bakabot.app".into(),
            title: "BakaBot".into(),
            http: LlmHttpClient::new(DEFAULT_TIMEOUT, CONNECT_TIMEOUT),
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(api_key: String, config: &LlmConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            url: config.url.clone(),
            referer: config.app_url.clone(),
            title: config.app_title.clone(),
            http: LlmHttpClient::new(config.timeout, CONNECT_TIMEOUT.min(config.timeout)),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_body(&self, messages: Vec<Message>) -> Result<String> {
        let request = ChatRequest::new(&self.model, messages)
            .with_temperature(TEMPERATURE)
            .with_max_tokens(MAX_TOKENS);
        Ok(serde_json::to_string(&request)?)
    }

    #[instrument(skip(self, messages), fields(request_id, model = %self.model, message_count = messages.len()))]
    pub async fn chat(&self, messages: Vec<Message>) -> Result<ChatResult> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            message_count = messages.len(),
            model = %self.model,
            "Starting OpenRouter chat request"
        );

        let body = self.build_body(messages)?;
        debug!(request_id = %request_id, "OpenRouter request: {}", body);

        let headers = [
            ("HTTP-Referer", self.referer.as_str()),
            ("X-Title", self.title.as_str()),
        ];
        let response_body = self
            .http
            .execute(&request_id, &self.url, &self.api_key, &headers, body)
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let result = parse_chat_response(&response_body, &request_id, duration_ms)?;

        if let Some(ref u) = result.usage {
            crate::llm::logging::log_usage(&request_id, "OpenRouter", u);
        }
        crate::llm::logging::log_completion(
            &request_id,
            "OpenRouter",
            duration_ms,
            result.content.as_ref().map(|c| c.len()).unwrap_or(0),
        );

        Ok(result)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat(&self, messages: Vec<Message>) -> Result<ChatResult> {
        // Delegate to the inherent implementation
        self.chat(messages).await
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}
