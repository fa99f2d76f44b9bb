// src/mood/mod.rs
// Mood engine: sentiment scoring, momentum smoothing and emotion blending

pub mod action;
pub mod blend;
pub mod history;
pub mod sentiment;
pub mod stage;
pub mod store;
pub mod transition;

pub use action::{Action, narrate, resolve_action_impact};
pub use blend::{BlendedEmotionState, SECONDARY_THRESHOLD, blend};
pub use history::{HISTORY_CAPACITY, RECENT_WINDOW, RecentWindow, SessionMoodHistory, SessionSeed};
pub use sentiment::{CueMatch, SentimentAnalyzer, SentimentBreakdown, SentimentCategory};
pub use stage::{EmotionStage, MoodLevel};
pub use store::{InMemorySessionStore, SessionHandle, SessionStore};
pub use transition::{MoodTransition, MoodTransitionEngine, Trend};
