//! HTTP DTOs for chat endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::mail::AttachmentResponse;
use crate::domain::mail::ChatMessage;

/// `peer_id` query parameter naming the other side of a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerParams {
    pub peer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub session_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub attachments: Vec<AttachmentResponse>,
    pub created_at: String,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            session_id: message.session_id.to_string(),
            sender_id: message.sender_id.to_string(),
            receiver_id: message.receiver_id.to_string(),
            content: message.content.clone(),
            is_read: message.is_read,
            attachments: message.attachments.iter().map(Into::into).collect(),
            created_at: message.created_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}
