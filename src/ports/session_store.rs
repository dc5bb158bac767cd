//! SessionStore port - Session-wide queries and deletion over relational rows.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};

/// Row counts removed by one session deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionRowsDeleted {
    pub attachments: u64,
    pub recipients: u64,
    pub mails: u64,
    pub chat_messages: u64,
}

impl SessionRowsDeleted {
    pub fn total(&self) -> u64 {
        self.attachments + self.recipients + self.mails + self.chat_messages
    }
}

/// Port for session-scoped bulk operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Distinct session ids present in any mail, recipient link, attachment,
    /// or chat message row.
    async fn session_ids(&self) -> Result<BTreeSet<SessionId>, DomainError>;

    /// Delete every row belonging to `session_id` in one transaction.
    ///
    /// Either all four tables lose the session's rows or none do.
    async fn delete_session_rows(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionRowsDeleted, DomainError>;
}
