// src/lib.rs
// BakaBot - emotional-state engine for a tsundere AI companion

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod companion;
pub mod config;
pub mod error;
pub mod llm;
pub mod mood;
pub mod prompt;
pub mod web;

pub use error::{BakaError, Result};
