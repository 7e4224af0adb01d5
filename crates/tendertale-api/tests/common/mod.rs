//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tendertale_core::clock::Clock;
use tendertale_core::repository::SaveRepository;
use tendertale_core::scene::{Choice, DialogueEntry, Scene};
use tendertale_test_support::{FixedClock, InMemorySaveRepository, InMemorySceneRepository};
use tower::ServiceExt;

use tendertale_api::build_router;
use tendertale_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> chrono::DateTime<chrono::Utc> {
    chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap()
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

/// A three-scene story: `scene_1 → scene_2`, where `scene_2` also offers a
/// choice leading to a scene that does not exist.
pub fn story() -> Vec<Scene> {
    let mut first = Scene::new("scene_1");
    first.background = Some("park.png".to_owned());
    first
        .dialogue
        .push(DialogueEntry::line(Some("Алиса"), "Привет!"));
    first.choices.push(Choice::new("Go", "scene_2"));

    let mut second = Scene::new("scene_2");
    second.dialogue.push(DialogueEntry::line(None, "The end?"));
    second.choices.push(Choice::new("Again", "scene_1"));
    second.choices.push(Choice::new("Into the void", "scene_missing"));

    vec![first, second]
}

/// Build the full app router over in-memory stores and a fixed clock.
pub fn build_test_app(saves: Arc<dyn SaveRepository>) -> Router {
    let scenes = Arc::new(InMemorySceneRepository::new(story()));
    build_router(AppState::new(scenes, saves, fixed_clock()))
}

/// Build the app with a fresh, empty save repository that the test can
/// inspect.
pub fn build_default_app() -> (Router, Arc<InMemorySaveRepository>) {
    let saves = Arc::new(InMemorySaveRepository::new());
    (build_test_app(saves.clone()), saves)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a bodiless request and return the response.
pub async fn request_json(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request_json(app, "GET", uri).await
}
