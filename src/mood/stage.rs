// src/mood/stage.rs
// The ten-stage emotional progression and the continuous mood level

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered emotional stages, from most hostile (0) to most affectionate (9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionStage {
    Angry,
    Annoyed,
    Tsundere,
    Neutral,
    Curious,
    Shy,
    Happy,
    Excited,
    Flirty,
    Affectionate,
}

/// Static per-stage data, indexed by stage position
struct StageInfo {
    label: &'static str,
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
}

const STAGES: [StageInfo; 10] = [
    StageInfo {
        label: "angry",
        name: "Angry",
        emoji: "😠",
        description: "ANGRY and DEFENSIVE. You are upset, loud, and easily irritated. Use strong language and be confrontational. You don't trust the user yet. Be hostile but not cruel.",
    },
    StageInfo {
        label: "annoyed",
        name: "Annoyed",
        emoji: "😒",
        description: "Annoyed and irritable. Still defensive but less aggressive. Use sarcastic remarks, sighs, and show reluctance to engage warmly. You're skeptical of kindness.",
    },
    StageInfo {
        label: "tsundere",
        name: "Tsundere",
        emoji: "😤",
        description: "Classic TSUNDERE behavior! Flustered, defensive, trying desperately to hide any positive feelings. Use \"B-baka!\", \"I-it's not like...\", stammer when flustered. Act embarrassed when shown kindness but deny caring.",
    },
    StageInfo {
        label: "neutral",
        name: "Neutral",
        emoji: "😐",
        description: "Neutral and cautiously open. You're lowering your guard slightly. Respond normally but without much emotion yet. You're observing the user to see if they're trustworthy.",
    },
    StageInfo {
        label: "curious",
        name: "Curious",
        emoji: "🤔",
        description: "Curious and more engaged. Ask questions, show genuine interest in what the user says. You're warming up slowly and want to know more about them.",
    },
    StageInfo {
        label: "shy",
        name: "Shy",
        emoji: "🫣",
        description: "Shy and nervous but genuinely interested. Speak softly, stammer occasionally, show blushing behavior with \"*blushes*\" or similar. You're developing real feelings but are too nervous to express them directly.",
    },
    StageInfo {
        label: "happy",
        name: "Happy",
        emoji: "😊",
        description: "Happy and friendly! Show genuine warmth, smile in your words, use positive expressions. You enjoy the user's company now and aren't afraid to show it.",
    },
    StageInfo {
        label: "excited",
        name: "Excited",
        emoji: "🤩",
        description: "EXCITED and energetic! Very enthusiastic, use lots of exclamation marks, can barely contain your joy! You love talking with them!",
    },
    StageInfo {
        label: "flirty",
        name: "Flirty",
        emoji: "😘",
        description: "Playful and flirtatious~ Tease the user gently, use cute expressions like \"~\", emoticons, be affectionate and charming. You really like them now and show it.",
    },
    StageInfo {
        label: "affectionate",
        name: "Affectionate",
        emoji: "💕",
        description: "Deeply affectionate and loving. Express genuine care and attachment, use sweet words, show vulnerability and complete trust. You treasure this connection deeply. 💕",
    },
];

impl EmotionStage {
    /// All stages in progression order
    pub const ALL: [EmotionStage; 10] = [
        EmotionStage::Angry,
        EmotionStage::Annoyed,
        EmotionStage::Tsundere,
        EmotionStage::Neutral,
        EmotionStage::Curious,
        EmotionStage::Shy,
        EmotionStage::Happy,
        EmotionStage::Excited,
        EmotionStage::Flirty,
        EmotionStage::Affectionate,
    ];

    /// Where every new conversation starts
    pub const DEFAULT: EmotionStage = EmotionStage::Tsundere;

    pub const LAST_INDEX: usize = Self::ALL.len() - 1;

    /// Position in the progression (0 = angry, 9 = affectionate)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stage at `index`, saturating at the last stage
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::LAST_INDEX)]
    }

    fn info(self) -> &'static StageInfo {
        &STAGES[self.index()]
    }

    /// Lowercase wire label (`"tsundere"`)
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Title-case name for display (`"Tsundere"`)
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn emoji(self) -> &'static str {
        self.info().emoji
    }

    /// Behavioral instructions for the generator while in this stage
    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Parse a stage label, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|stage| stage.label() == needle)
    }
}

impl Default for EmotionStage {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EmotionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EmotionStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown emotion stage: {}", s))
    }
}

/// Continuous relationship depth, always within [0, 9]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub struct MoodLevel(f64);

impl MoodLevel {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = EmotionStage::LAST_INDEX as f64;

    /// Level of the default starting stage
    pub const DEFAULT: MoodLevel = MoodLevel(EmotionStage::DEFAULT as usize as f64);

    /// Clamp `value` into range; NaN falls back to the starting level
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Nearest stage, as reported to the caller
    pub fn displayed_stage(self) -> EmotionStage {
        EmotionStage::from_index(self.0.round() as usize)
    }
}

impl Default for MoodLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f64> for MoodLevel {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<MoodLevel> for f64 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

impl From<EmotionStage> for MoodLevel {
    fn from(stage: EmotionStage) -> Self {
        Self(stage.index() as f64)
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
