// src/error.rs
// Standardized error types for BakaBot

use std::time::Duration;
use thiserror::Error;

/// Main error type for the BakaBot library
#[derive(Error, Debug)]
pub enum BakaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using BakaError
pub type Result<T> = std::result::Result<T, BakaError>;

impl BakaError {
    /// Rejected before any state was touched (bad request or missing credential)
    pub fn is_rejection(&self) -> bool {
        matches!(self, BakaError::InvalidInput(_) | BakaError::Config(_))
    }
}

impl From<String> for BakaError {
    fn from(s: String) -> Self {
        BakaError::Other(s)
    }
}

impl From<BakaError> for String {
    fn from(err: BakaError) -> Self {
        err.to_string()
    }
}
