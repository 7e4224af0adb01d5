//! JSON documents addressed by id inside a directory.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tendertale_core::error::StoreError;

/// Resolves `id` to `<dir>/<id>.json`.
///
/// # Errors
///
/// Returns `StoreError::InvalidId` if `id` is empty, contains a path
/// separator or a `..` sequence, or contains a NUL byte.
pub fn document_path(dir: &Path, id: &str) -> Result<PathBuf, StoreError> {
    let invalid = id.is_empty()
        || id.contains(['/', '\\', '\0'])
        || id.contains("..");
    if invalid {
        return Err(StoreError::InvalidId(id.to_owned()));
    }
    Ok(dir.join(format!("{id}.json")))
}

pub(crate) fn io_error(path: &Path, err: &io::Error) -> StoreError {
    StoreError::Io(format!("{}: {err}", path.display()))
}

/// Reads and decodes the document at `path`. `what` names the document in
/// the `NotFound` message.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &Path,
    what: &str,
) -> Result<T, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(what.to_owned()));
        }
        Err(err) => return Err(io_error(path, &err)),
    };
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))
}

/// Encodes `value` as pretty JSON and writes it to `path`, creating the
/// parent directory on demand.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(parent, &e))?;
    }
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| io_error(path, &e))
}
