//! Per-user save slots.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tendertale_core::save::SaveState;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/save/{user_id}.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    /// The scene to resume at.
    pub current_scene_id: String,
    /// Visited scene ids, oldest first.
    #[serde(default)]
    pub scene_history: Vec<String>,
}

/// Confirmation returned by save and delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// GET /api/load/{user_id}
#[instrument(skip(state))]
async fn load_game(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SaveState>, ApiError> {
    let save = state.saves.load(&user_id).await?;
    Ok(Json(save))
}

/// POST /api/save/{user_id}
#[instrument(skip(state, request), fields(scene_id = %request.current_scene_id))]
async fn save_game(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let save = SaveState {
        saved_at: Some(state.clock.now()),
        ..SaveState::new(request.current_scene_id, request.scene_history)
    };
    state.saves.store(&user_id, &save).await?;

    info!(history_len = save.scene_history.len(), "game saved");

    Ok(Json(MessageResponse {
        message: "Game state saved successfully",
    }))
}

/// DELETE /api/save/{user_id}
#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.saves.delete(&user_id).await?;

    info!("save deleted");

    Ok(Json(MessageResponse {
        message: "Save state deleted successfully",
    }))
}

/// Returns the router for save endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/load/{user_id}", get(load_game))
        .route("/save/{user_id}", post(save_game).delete(delete_game))
}
