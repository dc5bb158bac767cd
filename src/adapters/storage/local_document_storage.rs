//! Local Filesystem Document Storage - Implementation of DocumentStorage.
//!
//! Saved editor documents live at `{base_path}/{session_id}/docs/{key}.docx`.

use async_trait::async_trait;
use std::path::PathBuf;

use super::fs_ops;
use crate::domain::foundation::{is_path_segment, SessionId};
use crate::ports::{DocumentStorage, StorageError};

const DOCS_DIR: &str = "docs";
const DOCUMENT_EXTENSION: &str = "docx";

#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    base_path: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn session_dir(&self, session_id: &SessionId) -> Result<PathBuf, StorageError> {
        if !session_id.is_path_safe() {
            return Err(StorageError::invalid_path(session_id.as_str()));
        }
        Ok(self.base_path.join(session_id.as_str()))
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    fn document_path(&self, session_id: &SessionId, key: &str) -> Result<PathBuf, StorageError> {
        if !is_path_segment(key) {
            return Err(StorageError::invalid_path(key));
        }
        Ok(self
            .session_dir(session_id)?
            .join(DOCS_DIR)
            .join(format!("{}.{}", key, DOCUMENT_EXTENSION)))
    }

    async fn load(&self, session_id: &SessionId, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.document_path(session_id, key)?;
        fs_ops::read_file(&path).await
    }

    async fn save(
        &self,
        session_id: &SessionId,
        key: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.document_path(session_id, key)?;
        fs_ops::write_atomic(&path, bytes).await?;
        tracing::info!(session_id = %session_id, key, path = %path.display(), "Saved document");
        Ok(path)
    }

    async fn delete_session_dir(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if session_id.is_reserved() {
            return Ok(());
        }
        let dir = self.session_dir(session_id)?;
        if fs_ops::remove_tree(&dir).await? {
            tracing::info!(session_id = %session_id, path = %dir.display(), "Removed session documents");
        }
        Ok(())
    }
}
