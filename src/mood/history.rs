// src/mood/history.rs
// Per-session rolling window of recent sentiment scores

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use super::stage::{EmotionStage, MoodLevel};

/// Scores kept per session; oldest evicted first
pub const HISTORY_CAPACITY: usize = 5;

/// Scores used for the stability check
pub const RECENT_WINDOW: usize = 3;

/// Values a session is created with on first contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSeed {
    pub mood: EmotionStage,
    pub level: MoodLevel,
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self {
            mood: EmotionStage::DEFAULT,
            level: MoodLevel::DEFAULT,
        }
    }
}

/// Up to [`RECENT_WINDOW`] most recent scores, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentWindow(Vec<f64>);

impl RecentWindow {
    pub fn scores(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mean of the window; 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    pub fn positive_count(&self) -> usize {
        self.0.iter().filter(|s| **s > 0.0).count()
    }

    pub fn negative_count(&self) -> usize {
        self.0.iter().filter(|s| **s < 0.0).count()
    }
}

/// Server-side memory for one conversation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMoodHistory {
    scores: VecDeque<f64>,
    pub last_mood: EmotionStage,
    pub last_mood_level: MoodLevel,
    pub turns: u64,
    pub updated_at: DateTime<Utc>,
}

impl SessionMoodHistory {
    pub fn new(seed: SessionSeed) -> Self {
        Self {
            scores: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            last_mood: seed.mood,
            last_mood_level: seed.level,
            turns: 0,
            updated_at: Utc::now(),
        }
    }

    /// Append a score (evicting the oldest past capacity) and return the recent window
    pub fn record(&mut self, score: f64) -> RecentWindow {
        self.scores.push_back(score);
        while self.scores.len() > HISTORY_CAPACITY {
            self.scores.pop_front();
        }
        self.turns += 1;
        self.updated_at = Utc::now();
        self.recent_window()
    }

    pub fn recent_window(&self) -> RecentWindow {
        let skip = self.scores.len().saturating_sub(RECENT_WINDOW);
        RecentWindow(self.scores.iter().skip(skip).copied().collect())
    }

    /// All retained scores, oldest first
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Default for SessionMoodHistory {
    fn default() -> Self {
        Self::new(SessionSeed::default())
    }
}
