//! Document Storage Port - Files produced by the document editor.
//!
//! ```text
//! {documents_dir}/{session_id}/docs/{key}.docx
//! ```

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::foundation::SessionId;

use super::StorageError;

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Location of the saved document for `key`, whether or not it exists yet.
    ///
    /// # Errors
    ///
    /// `InvalidPath` if `key` or the session id is not a single path segment.
    fn document_path(&self, session_id: &SessionId, key: &str) -> Result<PathBuf, StorageError>;

    /// Read the saved document, `NotFound` if the editor never saved it.
    async fn load(&self, session_id: &SessionId, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Atomically replace the saved document for `key`.
    async fn save(&self, session_id: &SessionId, key: &str, bytes: &[u8])
        -> Result<PathBuf, StorageError>;

    /// Remove every document saved for a session. No-op for the reserved
    /// default session; a missing subtree is not an error.
    async fn delete_session_dir(&self, session_id: &SessionId) -> Result<(), StorageError>;
}
