//! Local Filesystem Blob Storage - Implementation of BlobStorage.
//!
//! # Directory Structure
//!
//! ```text
//! {base_path}/
//! ├── s1/
//! │   └── 2024/03/07/
//! │       ├── 6f1c...-report.pdf
//! │       └── 9ab2...-photo.png
//! └── default/
//!     └── ...
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::fs_ops;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{BlobStorage, StorageError};

/// Stores attachment content under a local upload directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    base_path: PathBuf,
}

impl LocalBlobStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Empty sessions are stored under the reserved default session.
    fn session_segment(session_id: &SessionId) -> Result<&str, StorageError> {
        if session_id.as_str().is_empty() {
            return Ok(crate::domain::foundation::DEFAULT_SESSION_ID);
        }
        if !session_id.is_path_safe() {
            return Err(StorageError::invalid_path(session_id.as_str()));
        }
        Ok(session_id.as_str())
    }

    /// Keeps only the final component of a client-supplied file name.
    fn clean_file_name(file_name: &str) -> String {
        let last = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .replace('\0', "");
        match last.as_str() {
            "" | "." | ".." => "file".to_string(),
            _ => last,
        }
    }

    fn relative_upload_path(
        session_id: &SessionId,
        file_name: &str,
        at: Timestamp,
    ) -> Result<String, StorageError> {
        let session = Self::session_segment(session_id)?;
        let [year, month, day] = at.date_segments();
        Ok(format!(
            "{}/{}/{}/{}/{}-{}",
            session,
            year,
            month,
            day,
            Uuid::new_v4(),
            Self::clean_file_name(file_name)
        ))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        session_id: &SessionId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let relative = Self::relative_upload_path(session_id, file_name, Timestamp::now())?;
        fs_ops::write_atomic(&self.base_path.join(&relative), bytes).await?;

        tracing::debug!(
            session_id = %session_id,
            path = %relative,
            size = bytes.len(),
            "Stored attachment"
        );
        Ok(relative)
    }

    async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError> {
        if !fs_ops::is_contained(Path::new(relative_path)) {
            return Err(StorageError::invalid_path(relative_path));
        }
        fs_ops::read_file(&self.base_path.join(relative_path))
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => StorageError::not_found(relative_path),
                other => other,
            })
    }

    async fn delete_session_dir(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if session_id.is_reserved() {
            return Ok(());
        }
        if !session_id.is_path_safe() {
            return Err(StorageError::invalid_path(session_id.as_str()));
        }

        let dir = self.base_path.join(session_id.as_str());
        if fs_ops::remove_tree(&dir).await? {
            tracing::info!(session_id = %session_id, path = %dir.display(), "Removed session uploads");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_storage() -> (LocalBlobStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalBlobStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn upload_then_read_returns_content() {
        let (storage, _dir) = create_storage();

        let path = storage
            .upload(&SessionId::new("s1"), "notes.txt", b"hello")
            .await
            .unwrap();

        assert_eq!(storage.read(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn upload_path_is_grouped_by_session_and_date() {
        let (storage, _dir) = create_storage();

        let path = storage
            .upload(&SessionId::new("s1"), "notes.txt", b"x")
            .await
            .unwrap();

        let parts: Vec<&str> = path.split('/').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "s1");
        assert_eq!(parts[1].len(), 4);
        assert_eq!(parts[2].len(), 2);
        assert_eq!(parts[3].len(), 2);
        assert!(parts[4].ends_with("-notes.txt"));
    }

    #[tokio::test]
    async fn empty_session_uploads_under_default() {
        let (storage, _dir) = create_storage();

        let path = storage
            .upload(&SessionId::new(""), "a.bin", b"x")
            .await
            .unwrap();

        assert!(path.starts_with("default/"));
    }

    #[tokio::test]
    async fn client_directories_are_stripped_from_file_names() {
        let (storage, dir) = create_storage();

        let path = storage
            .upload(&SessionId::new("s1"), "../../evil.sh", b"x")
            .await
            .unwrap();

        assert!(path.ends_with("-evil.sh"));
        assert!(dir.path().join(&path).exists());
    }

    #[tokio::test]
    async fn read_rejects_traversal() {
        let (storage, _dir) = create_storage();

        let result = storage.read("../outside.txt").await;

        assert!(matches!(result, Err(StorageError::InvalidPath { .. })));
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (storage, _dir) = create_storage();

        let result = storage.read("s1/2024/01/01/nope.txt").await;

        assert!(matches!(result, Err(StorageError::NotFound { path }) if path == "s1/2024/01/01/nope.txt"));
    }

    #[tokio::test]
    async fn delete_session_dir_removes_only_that_session() {
        let (storage, dir) = create_storage();
        storage.upload(&SessionId::new("s1"), "a", b"1").await.unwrap();
        storage.upload(&SessionId::new("s1"), "b", b"2").await.unwrap();
        let kept = storage.upload(&SessionId::new("s2"), "c", b"3").await.unwrap();

        storage.delete_session_dir(&SessionId::new("s1")).await.unwrap();

        assert!(!dir.path().join("s1").exists());
        assert_eq!(storage.read(&kept).await.unwrap(), b"3");
    }

    #[tokio::test]
    async fn delete_session_dir_skips_default_and_empty() {
        let (storage, dir) = create_storage();
        storage.upload(&SessionId::default_session(), "a", b"1").await.unwrap();

        storage.delete_session_dir(&SessionId::default_session()).await.unwrap();
        storage.delete_session_dir(&SessionId::new("")).await.unwrap();

        assert!(dir.path().join("default").exists());
    }

    #[tokio::test]
    async fn delete_missing_session_dir_is_ok() {
        let (storage, _dir) = create_storage();
        storage.delete_session_dir(&SessionId::new("never")).await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_unsafe_session_id() {
        let (storage, _dir) = create_storage();
        let result = storage.delete_session_dir(&SessionId::new("..")).await;
        assert!(matches!(result, Err(StorageError::InvalidPath { .. })));
    }
}
