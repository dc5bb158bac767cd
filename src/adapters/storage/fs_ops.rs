//! Filesystem helpers shared by the local storage adapters.

use std::path::{Component, Path};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::ports::StorageError;

/// Writes `bytes` to `final_path` via a sibling temp file and rename.
///
/// Parent directories are created as needed. Readers never see a partially
/// written file. Each call gets its own temp file, so concurrent writers of
/// one path race only on the final rename.
pub(super) async fn write_atomic(final_path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = final_path.as_os_str().to_os_string();
    temp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let temp_path = Path::new(&temp_name);

    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(bytes).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to write to temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::io(format!(
            "Failed to sync temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    fs::rename(temp_path, final_path).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })
}

/// Reads a whole file, mapping missing files to `NotFound`.
pub(super) async fn read_file(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path)
        .await
        .map_err(|e| StorageError::from_io(e, path.display().to_string()))
}

/// Removes a directory tree. A tree that is already gone is not an error.
pub(super) async fn remove_tree(path: &Path) -> Result<bool, StorageError> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::from_io(e, path.display().to_string())),
    }
}

/// True if `relative` is a non-empty path made only of plain segments.
pub(super) fn is_contained(relative: &Path) -> bool {
    let mut components = relative.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
