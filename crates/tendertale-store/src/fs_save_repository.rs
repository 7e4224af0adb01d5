//! Filesystem implementation of the `SaveRepository` trait.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tendertale_core::error::StoreError;
use tendertale_core::repository::SaveRepository;
use tendertale_core::save::SaveState;
use tracing::{debug, info};

use crate::document::{document_path, io_error, read_json, write_json};

/// One pretty-printed JSON save file per user.
#[derive(Debug, Clone)]
pub struct FsSaveRepository {
    dir: PathBuf,
}

impl FsSaveRepository {
    /// Creates a repository storing saves in `dir`. The directory is created
    /// on the first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn missing(user_id: &str) -> StoreError {
    StoreError::NotFound(format!("no save state found for user {user_id}"))
}

#[async_trait]
impl SaveRepository for FsSaveRepository {
    async fn load(&self, user_id: &str) -> Result<SaveState, StoreError> {
        let path = document_path(&self.dir, user_id)?;
        debug!(path = %path.display(), "reading save");
        read_json(&path, &format!("no save state found for user {user_id}")).await
    }

    async fn store(&self, user_id: &str, state: &SaveState) -> Result<(), StoreError> {
        let path = document_path(&self.dir, user_id)?;
        write_json(&path, state).await?;
        info!(user_id, scene_id = %state.current_scene_id, "save written");
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let path = document_path(&self.dir, user_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(user_id, "save deleted");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(missing(user_id)),
            Err(err) => Err(io_error(&path, &err)),
        }
    }
}
