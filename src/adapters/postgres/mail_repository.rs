//! PostgreSQL implementation of MailRepository.
//!
//! Mail rows are loaded first, then their recipient links and attachments are
//! fetched in one query each and stitched back on.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    AttachmentId, ChatMessageId, DomainError, ErrorCode, MailId, RecipientLinkId, SessionId,
    Timestamp, UserId,
};
use crate::domain::mail::{
    Attachment, ChatMessage, Mail, MailRecipient, RecipientKind, RecipientStatus, SenderStatus,
};
use crate::ports::{MailPage, MailRepository, MailboxQuery};

/// PostgreSQL implementation of MailRepository.
#[derive(Clone)]
pub struct PostgresMailRepository {
    pool: PgPool,
}

impl PostgresMailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches recipient links and attachments to freshly loaded mails.
    async fn hydrate(&self, mut mails: Vec<Mail>) -> Result<Vec<Mail>, DomainError> {
        if mails.is_empty() {
            return Ok(mails);
        }
        let ids: Vec<Uuid> = mails.iter().map(|m| *m.id.as_uuid()).collect();

        let recipient_rows = sqlx::query(
            r#"
            SELECT id, mail_id, session_id, recipient_id, type, status, read_at
            FROM mail_recipients
            WHERE mail_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch mail recipients", e))?;

        let attachment_rows = sqlx::query(
            r#"
            SELECT id, mail_id, chat_message_id, session_id, file_name, file_path,
                   file_size, mime_type, created_at
            FROM attachments
            WHERE mail_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch mail attachments", e))?;

        let mut recipients: HashMap<MailId, Vec<MailRecipient>> = HashMap::new();
        for row in recipient_rows {
            let link = row_to_recipient(&row)?;
            recipients.entry(link.mail_id).or_default().push(link);
        }

        let mut attachments: HashMap<MailId, Vec<Attachment>> = HashMap::new();
        for row in attachment_rows {
            let attachment = row_to_attachment(&row)?;
            if let Some(mail_id) = attachment.mail_id {
                attachments.entry(mail_id).or_default().push(attachment);
            }
        }

        for mail in mails.iter_mut() {
            mail.recipients = recipients.remove(&mail.id).unwrap_or_default();
            mail.attachments = attachments.remove(&mail.id).unwrap_or_default();
        }
        Ok(mails)
    }

    async fn chat_attachments(
        &self,
        messages: &mut [ChatMessage],
    ) -> Result<(), DomainError> {
        if messages.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = messages.iter().map(|m| *m.id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, mail_id, chat_message_id, session_id, file_name, file_path,
                   file_size, mime_type, created_at
            FROM attachments
            WHERE chat_message_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch chat attachments", e))?;

        let mut by_message: HashMap<ChatMessageId, Vec<Attachment>> = HashMap::new();
        for row in rows {
            let attachment = row_to_attachment(&row)?;
            if let Some(message_id) = attachment.chat_message_id {
                by_message.entry(message_id).or_default().push(attachment);
            }
        }
        for message in messages.iter_mut() {
            message.attachments = by_message.remove(&message.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl MailRepository for PostgresMailRepository {
    async fn create_mail(&self, mail: &Mail) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO mails (
                id, session_id, sender_id, sender_status, subject, content,
                content_type, parent_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(mail.id.as_uuid())
        .bind(mail.session_id.as_str())
        .bind(mail.sender_id.as_str())
        .bind(mail.sender_status.as_str())
        .bind(&mail.subject)
        .bind(&mail.content)
        .bind(&mail.content_type)
        .bind(mail.parent_id.map(|p| *p.as_uuid()))
        .bind(mail.created_at.as_datetime())
        .bind(mail.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert mail", e))?;

        for link in &mail.recipients {
            sqlx::query(
                r#"
                INSERT INTO mail_recipients (
                    id, mail_id, session_id, recipient_id, type, status, read_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(link.id.as_uuid())
            .bind(link.mail_id.as_uuid())
            .bind(link.session_id.as_str())
            .bind(link.recipient_id.as_str())
            .bind(link.kind.as_str())
            .bind(link.status.as_str())
            .bind(link.read_at.map(|t| *t.as_datetime()))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to insert mail recipient", e))?;
        }

        for attachment in &mail.attachments {
            insert_attachment(&mut tx, attachment).await?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit mail", e))?;

        Ok(())
    }

    async fn find_mail(&self, session_id: &SessionId, id: MailId) -> Result<Mail, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, sender_id, sender_status, subject, content,
                   content_type, parent_id, created_at, updated_at
            FROM mails
            WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch mail", e))?;

        let mail = match row {
            Some(row) => row_to_mail(&row)?,
            None => {
                return Err(DomainError::new(
                    ErrorCode::MailNotFound,
                    format!("Mail not found: {}", id),
                ))
            }
        };

        let mut hydrated = self.hydrate(vec![mail]).await?;
        hydrated
            .pop()
            .ok_or_else(|| DomainError::new(ErrorCode::MailNotFound, format!("Mail not found: {}", id)))
    }

    async fn inbox(&self, query: &MailboxQuery) -> Result<MailPage, DomainError> {
        let pattern = query.search.as_ref().map(|s| format!("%{}%", s));

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM mails m
            WHERE m.session_id = $1
              AND EXISTS (
                  SELECT 1 FROM mail_recipients r
                  WHERE r.mail_id = m.id AND r.session_id = $1
                    AND r.recipient_id = $2 AND r.status <> 'deleted'
              )
              AND ($3::TEXT IS NULL OR m.subject LIKE $3 OR m.content LIKE $3)
            "#,
        )
        .bind(query.session_id.as_str())
        .bind(query.user_id.as_str())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count inbox", e))?;

        let rows = sqlx::query(
            r#"
            SELECT m.id, m.session_id, m.sender_id, m.sender_status, m.subject, m.content,
                   m.content_type, m.parent_id, m.created_at, m.updated_at
            FROM mails m
            WHERE m.session_id = $1
              AND EXISTS (
                  SELECT 1 FROM mail_recipients r
                  WHERE r.mail_id = m.id AND r.session_id = $1
                    AND r.recipient_id = $2 AND r.status <> 'deleted'
              )
              AND ($3::TEXT IS NULL OR m.subject LIKE $3 OR m.content LIKE $3)
            ORDER BY m.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.session_id.as_str())
        .bind(query.user_id.as_str())
        .bind(pattern.as_deref())
        .bind(i64::from(query.page_size))
        .bind(i64::from(query.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch inbox", e))?;

        let mails = rows.iter().map(row_to_mail).collect::<Result<Vec<_>, _>>()?;
        Ok(MailPage {
            mails: self.hydrate(mails).await?,
            total: total.0,
        })
    }

    async fn sent(&self, query: &MailboxQuery) -> Result<MailPage, DomainError> {
        let pattern = query.search.as_ref().map(|s| format!("%{}%", s));

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM mails
            WHERE session_id = $1 AND sender_id = $2 AND sender_status <> 'deleted'
              AND ($3::TEXT IS NULL OR subject LIKE $3 OR content LIKE $3)
            "#,
        )
        .bind(query.session_id.as_str())
        .bind(query.user_id.as_str())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count sent mails", e))?;

        let rows = sqlx::query(
            r#"
            SELECT id, session_id, sender_id, sender_status, subject, content,
                   content_type, parent_id, created_at, updated_at
            FROM mails
            WHERE session_id = $1 AND sender_id = $2 AND sender_status <> 'deleted'
              AND ($3::TEXT IS NULL OR subject LIKE $3 OR content LIKE $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.session_id.as_str())
        .bind(query.user_id.as_str())
        .bind(pattern.as_deref())
        .bind(i64::from(query.page_size))
        .bind(i64::from(query.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch sent mails", e))?;

        let mails = rows.iter().map(row_to_mail).collect::<Result<Vec<_>, _>>()?;
        Ok(MailPage {
            mails: self.hydrate(mails).await?,
            total: total.0,
        })
    }

    async fn update_recipient_status(
        &self,
        mail_id: MailId,
        recipient_id: &UserId,
        status: RecipientStatus,
        read_at: Option<Timestamp>,
    ) -> Result<bool, DomainError> {
        let read_at: Option<DateTime<Utc>> = read_at.map(|t| *t.as_datetime());

        // Only an unread link moves to read; a later read never replaces read_at.
        let result = sqlx::query(
            r#"
            UPDATE mail_recipients SET
                status = $3,
                read_at = COALESCE($4, read_at)
            WHERE mail_id = $1 AND recipient_id = $2
              AND ($3 <> 'read' OR status = 'unread')
            "#,
        )
        .bind(mail_id.as_uuid())
        .bind(recipient_id.as_str())
        .bind(status.as_str())
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update recipient status", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_sender(&self, mail_id: MailId) -> Result<(), DomainError> {
        sqlx::query("UPDATE mails SET sender_status = $2, updated_at = $3 WHERE id = $1")
            .bind(mail_id.as_uuid())
            .bind(SenderStatus::Deleted.as_str())
            .bind(Timestamp::now().as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete mail for sender", e))?;

        Ok(())
    }

    async fn find_attachment(
        &self,
        session_id: &SessionId,
        id: AttachmentId,
    ) -> Result<Attachment, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, mail_id, chat_message_id, session_id, file_name, file_path,
                   file_size, mime_type, created_at
            FROM attachments
            WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch attachment", e))?;

        match row {
            Some(row) => row_to_attachment(&row),
            None => Err(DomainError::new(
                ErrorCode::AttachmentNotFound,
                format!("Attachment not found: {}", id),
            )),
        }
    }

    async fn create_chat_message(&self, message: &ChatMessage) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO chat_messages (
                id, session_id, sender_id, receiver_id, content, is_read, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.session_id.as_str())
        .bind(message.sender_id.as_str())
        .bind(message.receiver_id.as_str())
        .bind(&message.content)
        .bind(message.is_read)
        .bind(message.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert chat message", e))?;

        for attachment in &message.attachments {
            insert_attachment(&mut tx, attachment).await?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit chat message", e))?;

        Ok(())
    }

    async fn chat_history(
        &self,
        session_id: &SessionId,
        user_a: &UserId,
        user_b: &UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, sender_id, receiver_id, content, is_read, created_at
            FROM chat_messages
            WHERE session_id = $1
              AND ((sender_id = $2 AND receiver_id = $3) OR (sender_id = $3 AND receiver_id = $2))
            ORDER BY created_at ASC
            LIMIT $4
            "#,
        )
        .bind(session_id.as_str())
        .bind(user_a.as_str())
        .bind(user_b.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch chat history", e))?;

        let mut messages = rows
            .iter()
            .map(row_to_chat_message)
            .collect::<Result<Vec<_>, _>>()?;
        self.chat_attachments(&mut messages).await?;
        Ok(messages)
    }

    async fn mark_chat_read(
        &self,
        session_id: &SessionId,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages SET is_read = TRUE
            WHERE session_id = $1 AND sender_id = $2 AND receiver_id = $3 AND is_read = FALSE
            "#,
        )
        .bind(session_id.as_str())
        .bind(sender.as_str())
        .bind(receiver.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark chat read", e))?;

        Ok(result.rows_affected())
    }

    async fn unread_mail_count(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<i64, DomainError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM mail_recipients
            WHERE session_id = $1 AND recipient_id = $2 AND status = 'unread'
            "#,
        )
        .bind(session_id.as_str())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unread mail", e))?;

        Ok(count.0)
    }

    async fn im_unread_counts(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<BTreeMap<String, i64>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT sender_id, COUNT(*) FROM chat_messages
            WHERE session_id = $1 AND receiver_id = $2 AND is_read = FALSE
            GROUP BY sender_id
            "#,
        )
        .bind(session_id.as_str())
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unread chat messages", e))?;

        Ok(rows.into_iter().collect())
    }
}

async fn insert_attachment(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    attachment: &Attachment,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO attachments (
            id, mail_id, chat_message_id, session_id, file_name, file_path,
            file_size, mime_type, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(attachment.id.as_uuid())
    .bind(attachment.mail_id.map(|m| *m.as_uuid()))
    .bind(attachment.chat_message_id.map(|c| *c.as_uuid()))
    .bind(attachment.session_id.as_str())
    .bind(&attachment.file_name)
    .bind(&attachment.file_path)
    .bind(attachment.file_size)
    .bind(&attachment.mime_type)
    .bind(attachment.created_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to insert attachment", e))?;

    Ok(())
}

fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, err))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_mail(row: &PgRow) -> Result<Mail, DomainError> {
    let sender_status: Option<String> = column(row, "sender_status")?;
    let parent_id: Option<Uuid> = column(row, "parent_id")?;
    let sender_id: String = column(row, "sender_id")?;
    let session_id: String = column(row, "session_id")?;

    Ok(Mail {
        id: MailId::from_uuid(column(row, "id")?),
        session_id: SessionId::new(session_id),
        sender_id: UserId::new(sender_id)?,
        sender_status: SenderStatus::from_stored(sender_status.as_deref()),
        subject: column(row, "subject")?,
        content: column(row, "content")?,
        content_type: column(row, "content_type")?,
        parent_id: parent_id.map(MailId::from_uuid),
        created_at: Timestamp::from_datetime(column(row, "created_at")?),
        updated_at: Timestamp::from_datetime(column(row, "updated_at")?),
        attachments: Vec::new(),
        recipients: Vec::new(),
    })
}

fn row_to_recipient(row: &PgRow) -> Result<MailRecipient, DomainError> {
    let kind: String = column(row, "type")?;
    let status: String = column(row, "status")?;
    let session_id: String = column(row, "session_id")?;
    let recipient_id: String = column(row, "recipient_id")?;
    let read_at: Option<DateTime<Utc>> = column(row, "read_at")?;

    Ok(MailRecipient {
        id: RecipientLinkId::from_uuid(column(row, "id")?),
        mail_id: MailId::from_uuid(column(row, "mail_id")?),
        session_id: SessionId::new(session_id),
        recipient_id: UserId::new(recipient_id)?,
        kind: kind.parse::<RecipientKind>()?,
        status: status.parse::<RecipientStatus>()?,
        read_at: read_at.map(Timestamp::from_datetime),
    })
}

fn row_to_attachment(row: &PgRow) -> Result<Attachment, DomainError> {
    let mail_id: Option<Uuid> = column(row, "mail_id")?;
    let chat_message_id: Option<Uuid> = column(row, "chat_message_id")?;
    let session_id: String = column(row, "session_id")?;

    Ok(Attachment {
        id: AttachmentId::from_uuid(column(row, "id")?),
        mail_id: mail_id.map(MailId::from_uuid),
        chat_message_id: chat_message_id.map(ChatMessageId::from_uuid),
        session_id: SessionId::new(session_id),
        file_name: column(row, "file_name")?,
        file_path: column(row, "file_path")?,
        file_size: column(row, "file_size")?,
        mime_type: column(row, "mime_type")?,
        created_at: Timestamp::from_datetime(column(row, "created_at")?),
    })
}

fn row_to_chat_message(row: &PgRow) -> Result<ChatMessage, DomainError> {
    let session_id: String = column(row, "session_id")?;
    let sender_id: String = column(row, "sender_id")?;
    let receiver_id: String = column(row, "receiver_id")?;

    Ok(ChatMessage {
        id: ChatMessageId::from_uuid(column(row, "id")?),
        session_id: SessionId::new(session_id),
        sender_id: UserId::new(sender_id)?,
        receiver_id: UserId::new(receiver_id)?,
        content: column(row, "content")?,
        is_read: column(row, "is_read")?,
        created_at: Timestamp::from_datetime(column(row, "created_at")?),
        attachments: Vec::new(),
    })
}
