//! MailRepository port - Data access for mail, chat, and attachment rows.
//!
//! This is ordinary CRUD plumbing. Every operation is scoped by session so
//! that one session can never read another's rows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{
    AttachmentId, DomainError, MailId, SessionId, Timestamp, UserId,
};
use crate::domain::mail::{Attachment, ChatMessage, Mail, RecipientStatus};

/// Default page size for mailbox listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of messages returned by a chat history query.
pub const CHAT_HISTORY_LIMIT: u32 = 100;

/// Paged query over a user's inbox or sent folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxQuery {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub page: u32,
    pub page_size: u32,
    /// Substring matched against subject and content.
    pub search: Option<String>,
}

impl MailboxQuery {
    /// Builds a query, clamping page to >= 1 and page size to 1..=MAX_PAGE_SIZE.
    pub fn new(
        session_id: SessionId,
        user_id: UserId,
        page: Option<u32>,
        page_size: Option<u32>,
        search: Option<String>,
    ) -> Self {
        Self {
            session_id,
            user_id,
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            search: search.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

/// One page of mails plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct MailPage {
    pub mails: Vec<Mail>,
    pub total: i64,
}

/// Unread counters for a user within a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub unread_mail_count: i64,
    /// Unread chat messages keyed by sender id.
    pub im_unread_counts: BTreeMap<String, i64>,
}

/// Port for mail and chat persistence.
#[async_trait]
pub trait MailRepository: Send + Sync {
    /// Persist a mail with its recipient links and attachment rows in one transaction.
    async fn create_mail(&self, mail: &Mail) -> Result<(), DomainError>;

    /// Load a mail with links and attachments. `MailNotFound` if absent.
    async fn find_mail(&self, session_id: &SessionId, id: MailId) -> Result<Mail, DomainError>;

    /// Mails where the user is a recipient and has not deleted their copy, newest first.
    async fn inbox(&self, query: &MailboxQuery) -> Result<MailPage, DomainError>;

    /// Mails sent by the user and not deleted by them, newest first.
    async fn sent(&self, query: &MailboxQuery) -> Result<MailPage, DomainError>;

    /// Set a recipient's status. A move to `Read` only applies to an `unread`
    /// link and stores the given `read_at`; returns whether a link changed.
    async fn update_recipient_status(
        &self,
        mail_id: MailId,
        recipient_id: &UserId,
        status: RecipientStatus,
        read_at: Option<Timestamp>,
    ) -> Result<bool, DomainError>;

    /// Hide a mail from its sender's sent folder.
    async fn delete_for_sender(&self, mail_id: MailId) -> Result<(), DomainError>;

    /// Load attachment metadata. `AttachmentNotFound` if absent.
    async fn find_attachment(
        &self,
        session_id: &SessionId,
        id: AttachmentId,
    ) -> Result<Attachment, DomainError>;

    /// Persist a chat message and its attachment rows in one transaction.
    async fn create_chat_message(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Messages exchanged between two users, oldest first, capped at `limit`.
    async fn chat_history(
        &self,
        session_id: &SessionId,
        user_a: &UserId,
        user_b: &UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, DomainError>;

    /// Mark every unread message from `sender` to `receiver` as read.
    async fn mark_chat_read(
        &self,
        session_id: &SessionId,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<u64, DomainError>;

    /// Unread mails addressed to the user.
    async fn unread_mail_count(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<i64, DomainError>;

    /// Unread chat messages to the user, grouped by sender.
    async fn im_unread_counts(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<BTreeMap<String, i64>, DomainError>;
}
