// src/web/sessions.rs
// Session history inspection and removal

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::mood::{EmotionStage, MoodLevel, SessionMoodHistory};
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Stored history for one session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    /// Retained scores, oldest first
    pub recent_scores: Vec<f64>,
    pub last_mood_level: MoodLevel,
    pub last_mood: EmotionStage,
    pub turns: u64,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(session_id: String, history: &SessionMoodHistory) -> Self {
        Self {
            session_id,
            recent_scores: history.scores().collect(),
            last_mood_level: history.last_mood_level,
            last_mood: history.last_mood,
            turns: history.turns,
            updated_at: history.updated_at,
        }
    }
}

/// Get a session's history
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    match state.companion.session(&id).await {
        Some(history) => Ok(Json(SessionSnapshot::new(id, &history))),
        None => Err(ApiError::not_found(format!("Session not found: {}", id))),
    }
}

/// Forget a session
#[instrument(skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.companion.forget(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Session not found: {}", id)))
    }
}
