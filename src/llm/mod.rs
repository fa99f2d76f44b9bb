// src/llm/mod.rs
// External text generator (OpenRouter, OpenAI-compatible)

mod http_client;
mod logging;
mod openai_compat;
mod openrouter;
mod provider;
mod types;

pub use http_client::LlmHttpClient;
pub use openai_compat::{ChatRequest, parse_chat_response};
pub use openrouter::{DEFAULT_MODEL, MAX_TOKENS, OPENROUTER_API_URL, OpenRouterClient, TEMPERATURE};
pub use provider::LlmClient;
pub use types::{ChatResult, Message, Usage};
