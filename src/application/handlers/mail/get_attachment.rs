//! GetAttachmentHandler - Resolves an attachment id to its stored bytes.

use std::sync::Arc;

use crate::domain::foundation::{AttachmentId, DomainError, SessionId};
use crate::domain::mail::Attachment;
use crate::ports::{BlobStorage, MailRepository};

#[derive(Debug, Clone)]
pub struct GetAttachmentQuery {
    pub session_id: SessionId,
    pub attachment_id: AttachmentId,
}

/// Attachment metadata with its content.
#[derive(Debug, Clone)]
pub struct AttachmentContent {
    pub attachment: Attachment,
    pub bytes: Vec<u8>,
}

pub struct GetAttachmentHandler {
    repository: Arc<dyn MailRepository>,
    blobs: Arc<dyn BlobStorage>,
}

impl GetAttachmentHandler {
    pub fn new(repository: Arc<dyn MailRepository>, blobs: Arc<dyn BlobStorage>) -> Self {
        Self { repository, blobs }
    }

    pub async fn handle(&self, query: GetAttachmentQuery) -> Result<AttachmentContent, DomainError> {
        let attachment = self
            .repository
            .find_attachment(&query.session_id, query.attachment_id)
            .await?;
        let bytes = self.blobs.read(&attachment.file_path).await?;
        Ok(AttachmentContent { attachment, bytes })
    }
}
