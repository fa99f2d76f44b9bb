// src/web/chat.rs
// POST /api/chat - one companion turn

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::companion::{ChatTurn, TurnInput, TurnOutcome};
use crate::error::BakaError;
use crate::mood::{EmotionStage, MoodLevel};
use crate::web::error::ApiResult;
use crate::web::state::AppState;

/// Chat request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Free text; anything other than a string is rejected
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub action: Option<String>,
    /// Caller's displayed stage label
    #[serde(default)]
    pub current_mood: Option<String>,
    /// Caller's level before this turn; defaults to the starting level
    #[serde(default)]
    pub mood_level: Option<f64>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Validate into a turn. Runs before any session is touched.
    pub fn into_turn(self) -> Result<ChatTurn, BakaError> {
        let message = match self.message {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => {
                return Err(BakaError::InvalidInput(format!(
                    "message must be a string, got {}",
                    json_kind(&other)
                )));
            }
        };

        let input = TurnInput::from_parts(message, self.action)?;
        let mood_level = self
            .mood_level
            .map(MoodLevel::new)
            .unwrap_or_default();

        Ok(ChatTurn {
            session_id: self.session_id,
            input,
            current_mood: self.current_mood.as_deref().and_then(EmotionStage::parse),
            mood_level,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Chat response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub new_mood: EmotionStage,
    pub updated_mood_level: MoodLevel,
    pub session_id: String,
    pub primary_mood: EmotionStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emerging_mood: Option<EmotionStage>,
    pub blend_percent: u32,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            reply: outcome.reply,
            new_mood: outcome.new_mood,
            updated_mood_level: outcome.updated_mood_level,
            session_id: outcome.session_id,
            primary_mood: outcome.emotion.primary,
            emerging_mood: outcome.emotion.secondary,
            blend_percent: outcome.emotion.blend_percent(),
        }
    }
}

/// Chat handler
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    let turn = request.into_turn()?;
    debug!(session_id = ?turn.session_id, level = turn.mood_level.value(), "Chat request");

    let outcome = state.companion.respond(turn).await?;
    Ok(Json(outcome.into()))
}
