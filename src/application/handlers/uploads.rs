//! Stores uploaded files and turns them into attachment metadata.

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::mail::Attachment;
use crate::ports::BlobStorage;

/// A file received with a send request, not yet stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Uploads every file, stopping at the first failure.
pub(crate) async fn store_uploads(
    blobs: &dyn BlobStorage,
    session_id: &SessionId,
    files: Vec<UploadedFile>,
) -> Result<Vec<Attachment>, DomainError> {
    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        let path = blobs
            .upload(session_id, &file.file_name, &file.bytes)
            .await
            .map_err(|e| {
                tracing::warn!(session_id = %session_id, file = %file.file_name, error = %e, "Attachment upload failed");
                DomainError::from(e)
            })?;

        attachments.push(Attachment::new(
            session_id.clone(),
            file.file_name,
            path,
            file.bytes.len() as i64,
            file.mime_type,
        ));
    }
    Ok(attachments)
}
