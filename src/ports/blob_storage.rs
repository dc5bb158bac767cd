//! Blob Storage Port - Uploaded attachment content.
//!
//! Attachment rows in the relational store only carry a relative path; the
//! bytes live behind this port.
//!
//! # File Organization
//!
//! ```text
//! {uploads_dir}/{session_id}/{YYYY}/{MM}/{DD}/{uuid}-{file_name}
//! ```
//!
//! Grouping by session first means a whole session's content can be dropped
//! by removing one subtree.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Port for attachment content.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` and return the path relative to the storage root.
    ///
    /// An empty session id is stored under the reserved default session.
    async fn upload(
        &self,
        session_id: &SessionId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;

    /// Read content previously returned by [`BlobStorage::upload`].
    ///
    /// # Errors
    ///
    /// `InvalidPath` if `relative_path` escapes the storage root,
    /// `NotFound` if nothing is stored there.
    async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove every blob stored for a session.
    ///
    /// No-op for the empty and reserved default sessions. A missing subtree is
    /// not an error.
    async fn delete_session_dir(&self, session_id: &SessionId) -> Result<(), StorageError>;
}

/// Errors that can occur during file storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// File was not found.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Permission denied accessing the file.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Path would resolve outside the storage root.
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl StorageError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Maps an IO error, keeping the path the operation was working on.
    pub fn from_io(err: std::io::Error, path: impl Into<String>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(path),
            std::io::ErrorKind::PermissionDenied => StorageError::permission_denied(path),
            _ => StorageError::io(err.to_string()),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                StorageError::permission_denied(err.to_string())
            }
            _ => StorageError::io(err.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound { path } => {
                DomainError::new(ErrorCode::FileNotFound, err.to_string()).with_detail("path", path)
            }
            StorageError::InvalidPath { path } => {
                DomainError::validation("path", err.to_string()).with_detail("path", path)
            }
            _ => DomainError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}
