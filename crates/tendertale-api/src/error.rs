//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tendertale_core::error::StoreError;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Request failures, rendered as [`ErrorBody`] responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A repository failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The choice index does not address a choice of the scene.
    #[error("invalid choice index {choice_index}: scene has {available} choices")]
    InvalidChoice {
        /// Requested index.
        choice_index: usize,
        /// Number of choices in the scene.
        available: usize,
    },

    /// A choice leads to a scene that does not exist.
    #[error("error loading next scene '{0}'")]
    BrokenChoice(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Self::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Store(StoreError::InvalidId(_)) => (StatusCode::BAD_REQUEST, "invalid_id"),
            Self::Store(StoreError::Corrupt(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_document")
            }
            Self::Store(StoreError::Io(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            Self::InvalidChoice { .. } => (StatusCode::BAD_REQUEST, "invalid_choice"),
            Self::BrokenChoice(_) => (StatusCode::INTERNAL_SERVER_ERROR, "broken_choice"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ApiError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(StoreError::NotFound("scene 'x'".into()).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_id_and_invalid_choice_map_to_400() {
        assert_eq!(
            status_of(StoreError::InvalidId("../x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::InvalidChoice {
                choice_index: 3,
                available: 1,
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_storage_failures_map_to_500() {
        assert_eq!(
            status_of(StoreError::Io("disk unavailable".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(StoreError::Corrupt("bad json".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::BrokenChoice("scene_9".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
