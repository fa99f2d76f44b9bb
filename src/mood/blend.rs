// src/mood/blend.rs
// Maps a continuous mood level onto primary / emerging emotion stages

use serde::Serialize;

use super::stage::{EmotionStage, MoodLevel};

/// Blend fraction above which the next stage starts showing through
pub const SECONDARY_THRESHOLD: f64 = 0.3;

/// Derived per-turn emotion state; never stored.
///
/// `primary` blends upward from the stage below the level, while `displayed`
/// snaps to the nearest stage. The two can differ (3.6 -> neutral primary,
/// curious displayed); both are reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendedEmotionState {
    pub primary: EmotionStage,
    pub secondary: Option<EmotionStage>,
    pub blend_fraction: f64,
    pub displayed: EmotionStage,
}

impl BlendedEmotionState {
    /// Progress toward the secondary stage as a whole percentage
    pub fn blend_percent(&self) -> u32 {
        (self.blend_fraction * 100.0).round() as u32
    }
}

pub fn blend(level: MoodLevel) -> BlendedEmotionState {
    let value = level.value();
    let primary_index = (value.floor() as usize).min(EmotionStage::LAST_INDEX);
    let next_index = (primary_index + 1).min(EmotionStage::LAST_INDEX);
    let blend_fraction = value - primary_index as f64;

    let secondary = (blend_fraction > SECONDARY_THRESHOLD).then(|| EmotionStage::from_index(next_index));

    BlendedEmotionState {
        primary: EmotionStage::from_index(primary_index),
        secondary,
        blend_fraction,
        displayed: level.displayed_stage(),
    }
}
