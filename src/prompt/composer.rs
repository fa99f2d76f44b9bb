// src/prompt/composer.rs
// Builds the generator's system instructions from the blended emotion state

use serde::Serialize;
use std::fmt::Write as _;

use super::persona::{
    ACTION_REACTION_LINE, CLOSING_LINE, CRITICAL_LINE, DEFAULT_PERSONA_NAME, PERSONALITY_CORE,
    opener,
};
use crate::llm::Message;
use crate::mood::{BlendedEmotionState, MoodLevel};

/// Coarse direction of the recent sentiment average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentDirection {
    Positive,
    Negative,
    Neutral,
}

impl SentimentDirection {
    pub fn from_average(avg: f64) -> Self {
        if avg > 0.0 {
            Self::Positive
        } else if avg < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

/// Everything one turn contributes to the instructions
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub emotion: &'a BlendedEmotionState,
    pub mood_level: MoodLevel,
    pub avg_recent_sentiment: f64,
    /// Set only when the turn came from a discrete action
    pub action_context: Option<&'a str>,
}

/// Deterministic instruction builder: identical input gives identical text
#[derive(Debug, Clone)]
pub struct PromptComposer {
    persona_name: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA_NAME)
    }
}

impl PromptComposer {
    pub fn new(persona_name: impl Into<String>) -> Self {
        Self {
            persona_name: persona_name.into(),
        }
    }

    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    /// Behavioral guidance: the primary stage's description, plus a transition
    /// sentence when an emerging stage applies
    pub fn guidance(emotion: &BlendedEmotionState) -> String {
        let primary = emotion.primary;
        let mut guidance = primary.description().to_string();

        if let Some(secondary) = emotion.secondary {
            let _ = write!(
                guidance,
                "\n\nYou are transitioning toward feeling {secondary}. Show subtle hints of this emerging emotion - you're {}% of the way there. Blend characteristics from both {primary} and {secondary} naturally.",
                emotion.blend_percent()
            );
        }

        guidance
    }

    pub fn compose(&self, input: &PromptInput<'_>) -> String {
        let emotion = input.emotion;
        let direction = SentimentDirection::from_average(input.avg_recent_sentiment);

        let mut prompt = opener(&self.persona_name);
        prompt.push_str("\n\n");
        prompt.push_str(CRITICAL_LINE);
        prompt.push_str("\n\n");

        // Current state
        prompt.push_str("━━━ CURRENT EMOTIONAL STATE ━━━\n");
        let _ = writeln!(prompt, "Primary Mood: {}", emotion.primary.label().to_uppercase());
        if let Some(secondary) = emotion.secondary {
            let _ = writeln!(
                prompt,
                "Emerging Mood: {} ({}% there)",
                secondary,
                emotion.blend_percent()
            );
        }
        let _ = writeln!(prompt, "Mood Level: {}/9.0", input.mood_level);
        let _ = writeln!(prompt, "Display Mood: {}", emotion.displayed);
        let _ = writeln!(prompt, "Recent Sentiment: {}", direction.label());
        prompt.push('\n');

        prompt.push_str("━━━ BEHAVIORAL GUIDANCE ━━━\n");
        prompt.push_str(&Self::guidance(emotion));
        prompt.push_str("\n\n");

        prompt.push_str("━━━ PERSONALITY CORE ━━━\n");
        prompt.push_str(PERSONALITY_CORE);
        prompt.push_str("\n\n");

        if let Some(context) = input.action_context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("━━━ IMMEDIATE CONTEXT ━━━\n");
            prompt.push_str(context);
            prompt.push('\n');
            prompt.push_str(ACTION_REACTION_LINE);
            prompt.push_str("\n\n");
        }

        prompt.push_str(CLOSING_LINE);
        prompt
    }

    /// System + user message pair for the generator
    pub fn messages(&self, input: &PromptInput<'_>, user_content: impl Into<String>) -> Vec<Message> {
        vec![Message::system(self.compose(input)), Message::user(user_content)]
    }
}
