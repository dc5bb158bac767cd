//! Uploaded file metadata attached to a mail or chat message.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AttachmentId, ChatMessageId, MailId, SessionId, Timestamp};

/// Metadata row for an uploaded file.
///
/// `file_path` is relative to the blob store root and always starts with the
/// session segment, so dropping the session subtree removes the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_id: Option<MailId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_message_id: Option<ChatMessageId>,
    pub session_id: SessionId,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: Timestamp,
}

impl Attachment {
    pub fn new(
        session_id: SessionId,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        file_size: i64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: AttachmentId::new(),
            mail_id: None,
            chat_message_id: None,
            session_id,
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_size,
            mime_type: mime_type.into(),
            created_at: Timestamp::now(),
        }
    }

    pub(crate) fn linked_to_mail(mut self, mail_id: MailId) -> Self {
        self.mail_id = Some(mail_id);
        self
    }

    pub(crate) fn linked_to_chat(mut self, message_id: ChatMessageId) -> Self {
        self.chat_message_id = Some(message_id);
        self
    }

    /// MIME type to serve, falling back to a generic binary type.
    pub fn content_type(&self) -> &str {
        if self.mime_type.is_empty() {
            "application/octet-stream"
        } else {
            &self.mime_type
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mime_type_serves_as_octet_stream() {
        let a = Attachment::new(SessionId::new("s1"), "blob", "s1/blob", 1, "");
        assert_eq!(a.content_type(), "application/octet-stream");

        let b = Attachment::new(SessionId::new("s1"), "a.png", "s1/a.png", 1, "image/png");
        assert_eq!(b.content_type(), "image/png");
    }
}
