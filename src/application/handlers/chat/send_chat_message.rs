//! SendChatMessageHandler - Stores a direct message and notifies the receiver.

use std::sync::Arc;

use crate::application::handlers::uploads::{store_uploads, UploadedFile};
use crate::application::Notifier;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::mail::ChatMessage;
use crate::ports::{BlobStorage, MailRepository};

#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub session_id: SessionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub files: Vec<UploadedFile>,
}

pub struct SendChatMessageHandler {
    repository: Arc<dyn MailRepository>,
    blobs: Arc<dyn BlobStorage>,
    notifier: Notifier,
}

impl SendChatMessageHandler {
    pub fn new(
        repository: Arc<dyn MailRepository>,
        blobs: Arc<dyn BlobStorage>,
        notifier: Notifier,
    ) -> Self {
        Self {
            repository,
            blobs,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: SendChatMessageCommand) -> Result<ChatMessage, DomainError> {
        let attachments = store_uploads(self.blobs.as_ref(), &cmd.session_id, cmd.files).await?;
        let message = ChatMessage::compose(
            cmd.session_id,
            cmd.sender_id,
            cmd.receiver_id,
            cmd.content,
            attachments,
        )?;

        self.repository.create_chat_message(&message).await?;
        tracing::debug!(
            session_id = %message.session_id,
            message_id = %message.id,
            "Chat message stored"
        );

        self.notifier.chat_created(&message);
        Ok(message)
    }
}
