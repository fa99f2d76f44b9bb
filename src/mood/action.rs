// src/mood/action.rs
// Discrete companion actions and their mood-dependent impact

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::stage::MoodLevel;

/// Non-text interactions the UI can send instead of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Pat,
    Kiss,
    Eat,
    Watch,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Pat, Action::Kiss, Action::Eat, Action::Watch];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pat => "pat",
            Self::Kiss => "kiss",
            Self::Eat => "eat",
            Self::Watch => "watch",
        }
    }

    /// Sentiment impact given the mood level *before* this turn.
    /// The same gesture lands very differently depending on how close we are.
    pub fn impact(self, current: MoodLevel) -> f64 {
        let level = current.value();
        match self {
            Self::Pat => {
                if level <= 1.0 {
                    1.0
                } else if level <= 3.0 {
                    1.5
                } else if level <= 6.0 {
                    2.0
                } else {
                    1.0
                }
            }
            Self::Kiss => {
                if level <= 1.0 {
                    -1.0
                } else if level <= 2.0 {
                    0.0
                } else if level <= 4.0 {
                    1.0
                } else if level <= 6.0 {
                    2.5
                } else {
                    3.0
                }
            }
            Self::Eat | Self::Watch => {
                if level <= 1.0 {
                    0.5
                } else {
                    1.5
                }
            }
        }
    }

    /// Sentence handed to the generator describing what just happened
    pub fn context_sentence(self) -> &'static str {
        match self {
            Self::Pat => "The user just gently patted your head.",
            Self::Kiss => "The user just tried to kiss you!",
            Self::Eat => "The user wants to share food with you.",
            Self::Watch => "The user wants to watch something together with you.",
        }
    }

    /// Third-person narration for the chat transcript ("*patted you gently*")
    pub fn narration(self) -> &'static str {
        match self {
            Self::Pat => "patted you gently",
            Self::Kiss => "tried to kiss you",
            Self::Eat => "wants to share food with you",
            Self::Watch => "wants to watch something together",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact names only; "PAT" or " kiss " are unknown actions
        match s {
            "pat" => Ok(Self::Pat),
            "kiss" => Ok(Self::Kiss),
            "eat" => Ok(Self::Eat),
            "watch" => Ok(Self::Watch),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// Impact of an action given by name. Unknown names are not an error; they score 0.
pub fn resolve_action_impact(action_name: &str, current: MoodLevel) -> f64 {
    action_name
        .parse::<Action>()
        .map(|action| action.impact(current))
        .unwrap_or(0.0)
}

/// Narration for an action name, with a generic fallback for unknown ones
pub fn narrate(action_name: &str) -> &'static str {
    action_name
        .parse::<Action>()
        .map(Action::narration)
        .unwrap_or("did something")
}
