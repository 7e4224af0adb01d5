//! HTTP implementation of the `SceneBackend` trait.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tendertale_core::backend::SceneBackend;
use tendertale_core::error::BackendError;
use tendertale_core::save::SaveState;
use tendertale_core::scene::Scene;
use tracing::{debug, error, instrument};

/// Body of POST /api/choice.
#[derive(Debug, Serialize)]
struct ChoiceRequest<'a> {
    user_id: &'a str,
    current_scene_id: &'a str,
    choice_index: usize,
}

/// Body of POST /api/save/{user_id}.
#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    current_scene_id: &'a str,
    scene_history: &'a [String],
}

/// Confirmation returned by save and delete.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Error body; the server sends `message`, older servers only `error`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

/// Talks to the story backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSceneBackend {
    client: Client,
    base_url: Url,
}

impl HttpSceneBackend {
    /// Creates a backend client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a backend client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        debug!(url = %base_url, "created scene backend client");
        Self { client, base_url }
    }

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::Network(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, BackendError> {
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, what, "HTTP request failed");
            BackendError::Network(format!("request for {what} failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message.or(e.error))
                .unwrap_or(body);
            if status == StatusCode::NOT_FOUND {
                debug!(what, "backend reported not found");
                return Err(BackendError::NotFound(message));
            }
            error!(status = %status, error = %message, what, "backend error");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, what, "failed to parse response");
            BackendError::InvalidResponse(format!("{what}: {e}"))
        })
    }
}

#[async_trait]
impl SceneBackend for HttpSceneBackend {
    #[instrument(skip(self))]
    async fn fetch_scene(&self, scene_id: &str) -> Result<Scene, BackendError> {
        let url = self.endpoint(&["scene", scene_id])?;
        self.send(self.client.get(url), "scene").await
    }

    #[instrument(skip(self))]
    async fn send_choice(
        &self,
        user_id: &str,
        scene_id: &str,
        choice_index: usize,
    ) -> Result<Scene, BackendError> {
        let url = self.endpoint(&["choice"])?;
        let body = ChoiceRequest {
            user_id,
            current_scene_id: scene_id,
            choice_index,
        };
        self.send(self.client.post(url).json(&body), "choice").await
    }

    #[instrument(skip(self, state), fields(scene_id = %state.current_scene_id))]
    async fn save_game(&self, user_id: &str, state: &SaveState) -> Result<String, BackendError> {
        let url = self.endpoint(&["save", user_id])?;
        let body = SaveRequest {
            current_scene_id: &state.current_scene_id,
            scene_history: &state.scene_history,
        };
        let response: MessageResponse = self.send(self.client.post(url).json(&body), "save").await?;
        Ok(response.message)
    }

    #[instrument(skip(self))]
    async fn load_game(&self, user_id: &str) -> Result<SaveState, BackendError> {
        let url = self.endpoint(&["load", user_id])?;
        self.send(self.client.get(url), "save state").await
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, user_id: &str) -> Result<String, BackendError> {
        let url = self.endpoint(&["save", user_id])?;
        let response: MessageResponse = self.send(self.client.delete(url), "save").await?;
        Ok(response.message)
    }
}
