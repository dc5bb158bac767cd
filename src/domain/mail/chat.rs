//! Direct chat message between two users.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChatMessageId, DomainError, SessionId, Timestamp, UserId, ValidationError,
};

use super::Attachment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub session_id: SessionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    /// Builds an unread message with its attachments linked to it.
    ///
    /// # Errors
    ///
    /// Returns a validation error when both content and attachments are empty.
    pub fn compose(
        session_id: SessionId,
        sender_id: UserId,
        receiver_id: UserId,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() && attachments.is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }

        let id = ChatMessageId::new();
        Ok(Self {
            id,
            session_id,
            sender_id,
            receiver_id,
            content,
            is_read: false,
            created_at: Timestamp::now(),
            attachments: attachments
                .into_iter()
                .map(|a| a.linked_to_chat(id))
                .collect(),
        })
    }

    /// Full message as carried in live notifications.
    pub fn notification_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn compose_starts_unread() {
        let msg =
            ChatMessage::compose(SessionId::new("s1"), user("a"), user("b"), "hi", vec![]).unwrap();
        assert!(!msg.is_read);
        assert_eq!(msg.receiver_id, user("b"));
    }

    #[test]
    fn compose_rejects_empty_message() {
        let result = ChatMessage::compose(SessionId::new("s1"), user("a"), user("b"), " ", vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn attachment_only_message_is_allowed() {
        let att = Attachment::new(SessionId::new("s1"), "a.txt", "s1/a.txt", 3, "text/plain");
        let msg =
            ChatMessage::compose(SessionId::new("s1"), user("a"), user("b"), "", vec![att]).unwrap();
        assert_eq!(msg.attachments[0].chat_message_id, Some(msg.id));
    }

    #[test]
    fn payload_contains_full_message() {
        let msg =
            ChatMessage::compose(SessionId::new("s1"), user("a"), user("b"), "hi", vec![]).unwrap();
        let payload = msg.notification_payload();
        assert_eq!(payload["content"], "hi");
        assert_eq!(payload["receiver_id"], "b");
    }
}
