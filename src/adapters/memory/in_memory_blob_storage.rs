//! In-memory blob storage for tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{SessionId, DEFAULT_SESSION_ID};
use crate::ports::{BlobStorage, StorageError};

/// Keeps uploaded bytes keyed by relative path.
#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_after: Mutex<Option<usize>>,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `successes` more uploads through, then fails every upload.
    pub fn fail_uploads_after(&self, successes: usize) {
        *self.fail_after.lock().unwrap_or_else(|e| e.into_inner()) = Some(successes);
    }

    pub fn paths(&self) -> Vec<String> {
        self.blobs().keys().cloned().collect()
    }

    fn blobs(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        session_id: &SessionId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        {
            let mut fail_after = self.fail_after.lock().unwrap_or_else(|e| e.into_inner());
            match fail_after.as_mut() {
                Some(0) => return Err(StorageError::io("Injected upload failure")),
                Some(remaining) => *remaining -= 1,
                None => {}
            }
        }

        let session = if session_id.as_str().is_empty() {
            DEFAULT_SESSION_ID
        } else {
            session_id.as_str()
        };
        let path = format!("{}/{}-{}", session, Uuid::new_v4(), file_name);
        self.blobs().insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(relative_path))
    }

    async fn delete_session_dir(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if session_id.is_reserved() {
            return Ok(());
        }
        let prefix = format!("{}/", session_id);
        self.blobs().retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }
}
