//! Scene retrieval and choice resolution.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tendertale_core::error::StoreError;
use tendertale_core::save::SaveState;
use tendertale_core::scene::Scene;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceRequest {
    /// The player making the choice.
    pub user_id: String,
    /// The scene the choice belongs to.
    pub current_scene_id: String,
    /// Index into the scene's choices.
    pub choice_index: usize,
}

/// GET /api/scene/{id}
#[instrument(skip(state))]
async fn get_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
) -> Result<Json<Scene>, ApiError> {
    let scene = state.scenes.load_scene(&scene_id).await?;
    Ok(Json(scene))
}

/// POST /api/choice
///
/// Resolves the choice against the current scene, autosaves the player at
/// the next scene and returns it. A failed autosave is logged, not fatal.
#[instrument(
    skip(state, request),
    fields(
        user_id = %request.user_id,
        scene_id = %request.current_scene_id,
        choice_index = request.choice_index,
    )
)]
async fn make_choice(
    State(state): State<AppState>,
    Json(request): Json<ChoiceRequest>,
) -> Result<Json<Scene>, ApiError> {
    let current = state.scenes.load_scene(&request.current_scene_id).await?;
    let choice = current
        .choices
        .get(request.choice_index)
        .ok_or(ApiError::InvalidChoice {
            choice_index: request.choice_index,
            available: current.choices.len(),
        })?;
    let next_scene_id = choice.next_scene.clone();

    let autosave = SaveState {
        saved_at: Some(state.clock.now()),
        ..SaveState::new(next_scene_id.clone(), Vec::new())
    };
    if let Err(err) = state.saves.store(&request.user_id, &autosave).await {
        warn!(error = %err, "autosave failed, continuing with the choice");
    }

    let next = state
        .scenes
        .load_scene(&next_scene_id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => ApiError::BrokenChoice(next_scene_id.clone()),
            other => ApiError::Store(other),
        })?;

    info!(next_scene_id = %next.id, "choice resolved");
    Ok(Json(next))
}

/// Returns the router for scene and choice endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scene/{id}", get(get_scene))
        .route("/choice", post(make_choice))
}
