// src/web/api.rs
// Health and stage catalog handlers

use axum::{Json, response::IntoResponse};
use serde::Serialize;

use crate::mood::EmotionStage;

/// Health check
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// One entry of the mood progression
#[derive(Debug, Serialize)]
pub struct MoodInfo {
    pub label: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub level: usize,
    pub description: &'static str,
}

impl From<EmotionStage> for MoodInfo {
    fn from(stage: EmotionStage) -> Self {
        Self {
            label: stage.label(),
            name: stage.name(),
            emoji: stage.emoji(),
            level: stage.index(),
            description: stage.description(),
        }
    }
}

/// Ordered stage catalog, most hostile first
pub async fn list_moods() -> Json<Vec<MoodInfo>> {
    Json(EmotionStage::ALL.into_iter().map(MoodInfo::from).collect())
}
