// src/mood/sentiment.rs
// Lexical sentiment scoring for free-text messages
//
// Matching is plain substring containment on the lowercased message, so cues
// also fire inside longer words ("no" in "know", "care" inside "don't care").

use serde::Serialize;
use tracing::debug;

/// Weighted cue categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    VeryNegative,
    Negative,
    Positive,
    VeryPositive,
    Affectionate,
    Question,
}

impl SentimentCategory {
    /// Score contribution of one matched cue
    pub fn weight(self) -> f64 {
        match self {
            Self::VeryNegative => -2.0,
            Self::Negative => -1.0,
            Self::Question => 0.5,
            Self::Positive => 1.0,
            Self::VeryPositive => 2.0,
            Self::Affectionate => 3.0,
        }
    }
}

const VERY_NEGATIVE: &[&str] = &[
    "hate you",
    "shut up",
    "go away",
    "leave me alone",
    "annoying",
    "stupid",
    "idiot",
    "dumb",
];

const NEGATIVE: &[&str] = &["no", "bad", "boring", "whatever", "dont care", "don't care"];

const POSITIVE: &[&str] = &[
    "good",
    "nice",
    "thanks",
    "thank you",
    "great",
    "cool",
    "interesting",
    "fun",
];

const VERY_POSITIVE: &[&str] = &[
    "love",
    "amazing",
    "wonderful",
    "beautiful",
    "perfect",
    "incredible",
    "adorable",
    "cute",
];

const AFFECTIONATE: &[&str] = &["miss you", "adore", "treasure", "care about you", "special"];

const LEXICON: [(SentimentCategory, &[&str]); 5] = [
    (SentimentCategory::VeryNegative, VERY_NEGATIVE),
    (SentimentCategory::Negative, NEGATIVE),
    (SentimentCategory::Positive, POSITIVE),
    (SentimentCategory::VeryPositive, VERY_POSITIVE),
    (SentimentCategory::Affectionate, AFFECTIONATE),
];

/// One cue that contributed to a score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueMatch {
    pub cue: &'static str,
    pub category: SentimentCategory,
    pub weight: f64,
}

/// Score plus the cues that produced it
#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentBreakdown {
    pub score: f64,
    pub matches: Vec<CueMatch>,
}

/// Keyword-based valence scorer. Pure and deterministic; no bounds applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score `text`: each cue present adds its category weight once,
    /// and a question mark anywhere adds 0.5
    pub fn analyze(&self, text: &str) -> f64 {
        self.explain(text).score
    }

    /// Same as [`analyze`](Self::analyze) but keeps the matched cues
    pub fn explain(&self, text: &str) -> SentimentBreakdown {
        let lower = text.to_lowercase();
        let mut breakdown = SentimentBreakdown::default();

        for (category, cues) in LEXICON {
            for cue in cues.iter().filter(|cue| lower.contains(*cue)) {
                breakdown.push(cue, category);
            }
        }

        if lower.contains('?') {
            breakdown.push("?", SentimentCategory::Question);
        }

        if !breakdown.matches.is_empty() {
            debug!(
                score = breakdown.score,
                cues = ?breakdown.matches.iter().map(|m| m.cue).collect::<Vec<_>>(),
                "Sentiment cues matched"
            );
        }

        breakdown
    }
}

impl SentimentBreakdown {
    fn push(&mut self, cue: &'static str, category: SentimentCategory) {
        let weight = category.weight();
        self.score += weight;
        self.matches.push(CueMatch {
            cue,
            category,
            weight,
        });
    }
}
