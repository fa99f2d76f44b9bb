// src/prompt/mod.rs
// Instruction text for the external generator

pub mod composer;
pub mod persona;

pub use composer::{PromptComposer, PromptInput, SentimentDirection};
pub use persona::DEFAULT_PERSONA_NAME;
