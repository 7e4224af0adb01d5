//! Integration tests for save, load and delete.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_save_then_load_round_trips_history_with_timestamp() {
    // Arrange
    let (app, _) = common::build_default_app();
    let body = json!({ "current_scene_id": "scene_2", "scene_history": ["scene_1", "scene_2"] });

    // Act
    let (save_status, save_json) =
        common::post_json(app.clone(), "/api/save/player-1", &body).await;
    let (load_status, load_json) = common::get_json(app, "/api/load/player-1").await;

    // Assert
    assert_eq!(save_status, StatusCode::OK);
    assert_eq!(save_json["message"], "Game state saved successfully");
    assert_eq!(load_status, StatusCode::OK);
    assert_eq!(load_json["current_scene_id"], "scene_2");
    assert_eq!(load_json["scene_history"], json!(["scene_1", "scene_2"]));
    assert!(load_json["saved_at"].is_string());
}

#[tokio::test]
async fn test_save_without_history_stores_empty_history() {
    let (app, saves) = common::build_default_app();

    let body = json!({ "current_scene_id": "scene_1" });

    let (status, _) = common::post_json(app, "/api/save/player-1", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(saves.get("player-1").unwrap().scene_history.is_empty());
}

#[tokio::test]
async fn test_load_without_save_returns_404() {
    let (app, _) = common::build_default_app();

    let (status, json) = common::get_json(app, "/api/load/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "not found: no save state found for user nobody");
}

#[tokio::test]
async fn test_delete_removes_save_then_returns_404() {
    // Arrange
    let (app, saves) = common::build_default_app();
    common::post_json(
        app.clone(),
        "/api/save/player-1",
        &json!({ "current_scene_id": "scene_1" }),
    )
    .await;

    // Act
    let (first_status, first_json) =
        common::request_json(app.clone(), "DELETE", "/api/save/player-1").await;
    let (second_status, _) = common::request_json(app, "DELETE", "/api/save/player-1").await;

    // Assert
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(first_json["message"], "Save state deleted successfully");
    assert_eq!(second_status, StatusCode::NOT_FOUND);
    assert!(saves.get("player-1").is_none());
}
