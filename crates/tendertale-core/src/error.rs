//! Error types shared across the workspace.

use thiserror::Error;

/// Failure reported by a [`SceneBackend`](crate::backend::SceneBackend).
///
/// All variants are recoverable: the game controller turns them into
/// player-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The requested scene or save does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure reported by a scene or save repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document exists under the given id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The id cannot be used as a storage key.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// A stored document could not be decoded.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// The underlying storage failed.
    #[error("io error: {0}")]
    Io(String),
}
