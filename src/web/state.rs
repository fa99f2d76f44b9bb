// src/web/state.rs
// Shared state for the HTTP handlers

use std::sync::Arc;

use crate::companion::Companion;

/// Cloned into every handler; the companion owns the session store
#[derive(Clone)]
pub struct AppState {
    pub companion: Arc<Companion>,
}

impl AppState {
    pub fn new(companion: Companion) -> Self {
        Self {
            companion: Arc::new(companion),
        }
    }
}
