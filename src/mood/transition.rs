// src/mood/transition.rs
// Momentum-based mood smoothing
//
// A single message only nudges the level. Full-strength movement needs the
// recent window to agree on a direction (at least two scores of the same sign)
// and to average past the trend threshold.

use serde::Serialize;

use super::history::{RecentWindow, SessionMoodHistory};
use super::stage::MoodLevel;

/// Gain applied to the window average when a trend is confirmed
const TREND_GAIN: f64 = 0.6;
/// Gain applied to a lone score when no trend is confirmed
const SINGLE_GAIN: f64 = 0.3;
/// Window average (in magnitude) needed to confirm a trend
const TREND_THRESHOLD: f64 = 0.5;
/// Largest step a confirmed trend may take in one turn
const MAX_TREND_STEP: f64 = 1.0;
/// Scores of one sign needed to call the window consistent
const CONSISTENT_COUNT: usize = 2;

/// Which rule produced the delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Damped,
}

/// Result of one transition step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTransition {
    pub previous: MoodLevel,
    pub level: MoodLevel,
    pub raw_score: f64,
    pub delta: f64,
    pub avg_recent: f64,
    pub trend: Trend,
    pub window: RecentWindow,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoodTransitionEngine;

impl MoodTransitionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Record `raw_score` into `history` and move `current` accordingly.
    ///
    /// `current` is the caller's authoritative level; the history only
    /// contributes the trend signal.
    pub fn transition(
        &self,
        history: &mut SessionMoodHistory,
        raw_score: f64,
        current: MoodLevel,
    ) -> MoodTransition {
        let window = history.record(raw_score);
        let avg_recent = window.mean();
        let (delta, trend) = Self::delta(&window, raw_score, avg_recent);
        let level = MoodLevel::new(current.value() + delta);

        history.last_mood_level = level;
        history.last_mood = level.displayed_stage();

        MoodTransition {
            previous: current,
            level,
            raw_score,
            delta,
            avg_recent,
            trend,
            window,
        }
    }

    fn delta(window: &RecentWindow, raw_score: f64, avg_recent: f64) -> (f64, Trend) {
        if window.len() < CONSISTENT_COUNT {
            return (raw_score * SINGLE_GAIN, Trend::Damped);
        }

        let consistently_positive = window.positive_count() >= CONSISTENT_COUNT;
        let consistently_negative = window.negative_count() >= CONSISTENT_COUNT;

        if consistently_positive && avg_recent > TREND_THRESHOLD {
            ((avg_recent * TREND_GAIN).min(MAX_TREND_STEP), Trend::Rising)
        } else if consistently_negative && avg_recent < -TREND_THRESHOLD {
            ((avg_recent * TREND_GAIN).max(-MAX_TREND_STEP), Trend::Falling)
        } else {
            (raw_score * SINGLE_GAIN, Trend::Damped)
        }
    }
}
