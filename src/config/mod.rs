// src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{
    ApiKeys, ConfigValidation, DEFAULT_SESSION_KEY, EnvConfig, LlmConfig, ServerConfig,
    SessionConfig,
};
