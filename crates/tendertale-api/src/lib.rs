//! Tendertale API: the story backend.
//!
//! Serves authored scenes, resolves choices (autosaving the player's
//! progress) and manages per-user save slots over HTTP.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the router with every route, without middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::scene::router().merge(routes::save::router()))
        .with_state(state)
}
