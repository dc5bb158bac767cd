//! In-memory mail store for testing and local development.
//!
//! Implements both `MailRepository` and `SessionStore` over four row tables
//! that mirror the relational schema. Session deletion works on a copy of the
//! tables and only swaps it in once every table succeeded, so an injected
//! failure leaves all rows in place.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::{
    AttachmentId, DomainError, ErrorCode, MailId, SessionId, Timestamp, UserId,
};
use crate::domain::mail::{
    Attachment, ChatMessage, Mail, MailRecipient, RecipientStatus, SenderStatus,
};
use crate::ports::{MailPage, MailRepository, MailboxQuery, SessionRowsDeleted, SessionStore};

/// Table names used for failure injection.
pub const ATTACHMENTS_TABLE: &str = "attachments";
pub const RECIPIENTS_TABLE: &str = "mail_recipients";
pub const MAILS_TABLE: &str = "mails";
pub const CHAT_MESSAGES_TABLE: &str = "chat_messages";

#[derive(Debug, Clone, Default)]
struct Tables {
    mails: Vec<Mail>,
    recipients: Vec<MailRecipient>,
    attachments: Vec<Attachment>,
    chat_messages: Vec<ChatMessage>,
}

#[derive(Debug, Default)]
struct Failures {
    writes: bool,
    session_listing: bool,
    delete_table: Option<&'static str>,
    delete_sessions: BTreeSet<SessionId>,
}

/// In-memory implementation of the mail and session ports.
#[derive(Debug, Default)]
pub struct InMemoryMailStore {
    tables: Mutex<Tables>,
    failures: Mutex<Failures>,
}

impl InMemoryMailStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn failures(&self) -> MutexGuard<'_, Failures> {
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }

    // === Failure injection ===

    /// Makes `create_mail` and `create_chat_message` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.failures().writes = fail;
    }

    /// Makes `session_ids` fail.
    pub fn fail_session_listing(&self, fail: bool) {
        self.failures().session_listing = fail;
    }

    /// Makes session deletion fail when it reaches `table`.
    pub fn fail_deletes_on_table(&self, table: Option<&'static str>) {
        self.failures().delete_table = table;
    }

    /// Makes deletion of one specific session fail outright.
    pub fn fail_delete_of(&self, session_id: SessionId) {
        self.failures().delete_sessions.insert(session_id);
    }

    // === Inspection ===

    /// Rows carrying `session_id` across all four tables.
    pub fn row_count(&self, session_id: &SessionId) -> usize {
        let tables = self.tables();
        tables.mails.iter().filter(|m| &m.session_id == session_id).count()
            + tables
                .recipients
                .iter()
                .filter(|r| &r.session_id == session_id)
                .count()
            + tables
                .attachments
                .iter()
                .filter(|a| &a.session_id == session_id)
                .count()
            + tables
                .chat_messages
                .iter()
                .filter(|c| &c.session_id == session_id)
                .count()
    }

    pub fn mail_count(&self) -> usize {
        self.tables().mails.len()
    }

    pub fn chat_message_count(&self) -> usize {
        self.tables().chat_messages.len()
    }

    fn write_failure(&self, what: &str) -> Result<(), DomainError> {
        if self.failures().writes {
            return Err(DomainError::database(format!("Injected failure writing {}", what)));
        }
        Ok(())
    }

    fn hydrate(tables: &Tables, mail: &Mail) -> Mail {
        let mut mail = mail.clone();
        mail.recipients = tables
            .recipients
            .iter()
            .filter(|r| r.mail_id == mail.id)
            .cloned()
            .collect();
        mail.attachments = tables
            .attachments
            .iter()
            .filter(|a| a.mail_id == Some(mail.id))
            .cloned()
            .collect();
        mail
    }

    fn page<'a>(
        tables: &Tables,
        query: &MailboxQuery,
        matching: impl Iterator<Item = &'a Mail>,
    ) -> MailPage {
        let mut mails: Vec<&Mail> = matching
            .filter(|m| match &query.search {
                Some(s) => m.subject.contains(s.as_str()) || m.content.contains(s.as_str()),
                None => true,
            })
            .collect();
        mails.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = mails.len() as i64;
        let mails = mails
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .map(|m| Self::hydrate(tables, m))
            .collect();
        MailPage { mails, total }
    }
}

fn retain_session<T>(rows: &mut Vec<T>, session_id: &SessionId, of: impl Fn(&T) -> &SessionId) -> u64 {
    let before = rows.len();
    rows.retain(|row| of(row) != session_id);
    (before - rows.len()) as u64
}

#[async_trait]
impl MailRepository for InMemoryMailStore {
    async fn create_mail(&self, mail: &Mail) -> Result<(), DomainError> {
        self.write_failure("mail")?;

        let mut tables = self.tables();
        let mut row = mail.clone();
        row.recipients = Vec::new();
        row.attachments = Vec::new();
        tables.mails.push(row);
        tables.recipients.extend(mail.recipients.iter().cloned());
        tables.attachments.extend(mail.attachments.iter().cloned());
        Ok(())
    }

    async fn find_mail(&self, session_id: &SessionId, id: MailId) -> Result<Mail, DomainError> {
        let tables = self.tables();
        tables
            .mails
            .iter()
            .find(|m| m.id == id && &m.session_id == session_id)
            .map(|m| Self::hydrate(&tables, m))
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MailNotFound, format!("Mail not found: {}", id))
            })
    }

    async fn inbox(&self, query: &MailboxQuery) -> Result<MailPage, DomainError> {
        let tables = self.tables();
        let visible: HashSet<MailId> = tables
            .recipients
            .iter()
            .filter(|r| {
                r.session_id == query.session_id
                    && r.recipient_id == query.user_id
                    && r.status != RecipientStatus::Deleted
            })
            .map(|r| r.mail_id)
            .collect();

        let matching = tables
            .mails
            .iter()
            .filter(|m| m.session_id == query.session_id && visible.contains(&m.id));
        Ok(Self::page(&tables, query, matching))
    }

    async fn sent(&self, query: &MailboxQuery) -> Result<MailPage, DomainError> {
        let tables = self.tables();
        let matching = tables.mails.iter().filter(|m| {
            m.session_id == query.session_id
                && m.sender_id == query.user_id
                && m.sender_status != SenderStatus::Deleted
        });
        Ok(Self::page(&tables, query, matching))
    }

    async fn update_recipient_status(
        &self,
        mail_id: MailId,
        recipient_id: &UserId,
        status: RecipientStatus,
        read_at: Option<Timestamp>,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables();
        let mut changed = false;
        for link in tables.recipients.iter_mut().filter(|r| {
            r.mail_id == mail_id
                && &r.recipient_id == recipient_id
                && (status != RecipientStatus::Read || r.status == RecipientStatus::Unread)
        }) {
            link.status = status;
            if read_at.is_some() {
                link.read_at = read_at;
            }
            changed = true;
        }
        Ok(changed)
    }

    async fn delete_for_sender(&self, mail_id: MailId) -> Result<(), DomainError> {
        let mut tables = self.tables();
        if let Some(mail) = tables.mails.iter_mut().find(|m| m.id == mail_id) {
            mail.sender_status = SenderStatus::Deleted;
            mail.updated_at = Timestamp::now();
        }
        Ok(())
    }

    async fn find_attachment(
        &self,
        session_id: &SessionId,
        id: AttachmentId,
    ) -> Result<Attachment, DomainError> {
        self.tables()
            .attachments
            .iter()
            .find(|a| a.id == id && &a.session_id == session_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::AttachmentNotFound,
                    format!("Attachment not found: {}", id),
                )
            })
    }

    async fn create_chat_message(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.write_failure("chat message")?;

        let mut tables = self.tables();
        let mut row = message.clone();
        row.attachments = Vec::new();
        tables.chat_messages.push(row);
        tables.attachments.extend(message.attachments.iter().cloned());
        Ok(())
    }

    async fn chat_history(
        &self,
        session_id: &SessionId,
        user_a: &UserId,
        user_b: &UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let tables = self.tables();
        let mut messages: Vec<ChatMessage> = tables
            .chat_messages
            .iter()
            .filter(|m| {
                &m.session_id == session_id
                    && ((&m.sender_id == user_a && &m.receiver_id == user_b)
                        || (&m.sender_id == user_b && &m.receiver_id == user_a))
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages.truncate(limit as usize);

        for message in messages.iter_mut() {
            message.attachments = tables
                .attachments
                .iter()
                .filter(|a| a.chat_message_id == Some(message.id))
                .cloned()
                .collect();
        }
        Ok(messages)
    }

    async fn mark_chat_read(
        &self,
        session_id: &SessionId,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<u64, DomainError> {
        let mut tables = self.tables();
        let mut updated = 0;
        for message in tables.chat_messages.iter_mut().filter(|m| {
            &m.session_id == session_id
                && &m.sender_id == sender
                && &m.receiver_id == receiver
                && !m.is_read
        }) {
            message.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn unread_mail_count(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<i64, DomainError> {
        let count = self
            .tables()
            .recipients
            .iter()
            .filter(|r| {
                &r.session_id == session_id
                    && &r.recipient_id == user_id
                    && r.status == RecipientStatus::Unread
            })
            .count();
        Ok(count as i64)
    }

    async fn im_unread_counts(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<BTreeMap<String, i64>, DomainError> {
        let mut counts = BTreeMap::new();
        for message in self.tables().chat_messages.iter().filter(|m| {
            &m.session_id == session_id && &m.receiver_id == user_id && !m.is_read
        }) {
            *counts.entry(message.sender_id.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl SessionStore for InMemoryMailStore {
    async fn session_ids(&self) -> Result<BTreeSet<SessionId>, DomainError> {
        if self.failures().session_listing {
            return Err(DomainError::database("Injected failure listing sessions"));
        }

        let tables = self.tables();
        let ids = tables
            .mails
            .iter()
            .map(|m| m.session_id.clone())
            .chain(tables.recipients.iter().map(|r| r.session_id.clone()))
            .chain(tables.attachments.iter().map(|a| a.session_id.clone()))
            .chain(tables.chat_messages.iter().map(|c| c.session_id.clone()))
            .collect();
        Ok(ids)
    }

    async fn delete_session_rows(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionRowsDeleted, DomainError> {
        let (failing_table, failing_session) = {
            let failures = self.failures();
            (
                failures.delete_table,
                failures.delete_sessions.contains(session_id),
            )
        };
        if failing_session {
            return Err(DomainError::database(format!(
                "Injected failure deleting session {}",
                session_id
            )));
        }

        let mut tables = self.tables();
        let mut staged = tables.clone();
        let mut deleted = SessionRowsDeleted::default();

        let check = |table: &str| -> Result<(), DomainError> {
            if failing_table == Some(table) {
                return Err(DomainError::database(format!("Injected failure deleting {}", table))
                    .with_detail("session_id", session_id.as_str()));
            }
            Ok(())
        };

        check(ATTACHMENTS_TABLE)?;
        deleted.attachments = retain_session(&mut staged.attachments, session_id, |a| &a.session_id);
        check(RECIPIENTS_TABLE)?;
        deleted.recipients = retain_session(&mut staged.recipients, session_id, |r| &r.session_id);
        check(MAILS_TABLE)?;
        deleted.mails = retain_session(&mut staged.mails, session_id, |m| &m.session_id);
        check(CHAT_MESSAGES_TABLE)?;
        deleted.chat_messages =
            retain_session(&mut staged.chat_messages, session_id, |c| &c.session_id);

        *tables = staged;
        Ok(deleted)
    }
}
