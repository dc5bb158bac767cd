//! Chat history and read-receipt handlers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::mail::ChatMessage;
use crate::ports::{MailRepository, CHAT_HISTORY_LIMIT};

/// Query for the conversation between a user and one peer.
#[derive(Debug, Clone)]
pub struct ChatHistoryQuery {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub peer_id: UserId,
}

pub struct ChatHistoryHandler {
    repository: Arc<dyn MailRepository>,
}

impl ChatHistoryHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    /// Oldest first, at most `CHAT_HISTORY_LIMIT` messages.
    pub async fn handle(&self, query: ChatHistoryQuery) -> Result<Vec<ChatMessage>, DomainError> {
        self.repository
            .chat_history(
                &query.session_id,
                &query.user_id,
                &query.peer_id,
                CHAT_HISTORY_LIMIT,
            )
            .await
    }
}

/// Command marking every message from `peer_id` to `user_id` as read.
#[derive(Debug, Clone)]
pub struct MarkChatReadCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub peer_id: UserId,
}

pub struct MarkChatReadHandler {
    repository: Arc<dyn MailRepository>,
}

impl MarkChatReadHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: MarkChatReadCommand) -> Result<u64, DomainError> {
        self.repository
            .mark_chat_read(&cmd.session_id, &cmd.peer_id, &cmd.user_id)
            .await
    }
}
