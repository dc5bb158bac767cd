//! Mail record and its recipient links.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, MailId, RecipientLinkId, SessionId, Timestamp, UserId, ValidationError,
};

use super::Attachment;

/// How a recipient was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

impl RecipientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientKind::To => "to",
            RecipientKind::Cc => "cc",
            RecipientKind::Bcc => "bcc",
        }
    }
}

impl FromStr for RecipientKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to" => Ok(RecipientKind::To),
            "cc" => Ok(RecipientKind::Cc),
            "bcc" => Ok(RecipientKind::Bcc),
            other => Err(ValidationError::invalid_format(
                "recipient_type",
                format!("unknown recipient type '{}'", other),
            )),
        }
    }
}

/// Per-recipient state of a mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientStatus {
    Unread,
    Read,
    Deleted,
}

impl RecipientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientStatus::Unread => "unread",
            RecipientStatus::Read => "read",
            RecipientStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RecipientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(RecipientStatus::Unread),
            "read" => Ok(RecipientStatus::Read),
            "deleted" => Ok(RecipientStatus::Deleted),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown recipient status '{}'", other),
            )),
        }
    }
}

/// Whether the sender still sees the mail in their sent folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SenderStatus {
    #[default]
    Normal,
    Deleted,
}

impl SenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderStatus::Normal => "normal",
            SenderStatus::Deleted => "deleted",
        }
    }

    /// Parses a stored value; anything but `deleted` reads as normal.
    pub fn from_stored(s: Option<&str>) -> Self {
        match s {
            Some("deleted") => SenderStatus::Deleted,
            _ => SenderStatus::Normal,
        }
    }
}

/// Link between a mail and one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailRecipient {
    pub id: RecipientLinkId,
    pub mail_id: MailId,
    pub session_id: SessionId,
    pub recipient_id: UserId,
    #[serde(rename = "type")]
    pub kind: RecipientKind,
    pub status: RecipientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<Timestamp>,
}

/// Input for composing a new mail.
#[derive(Debug, Clone)]
pub struct NewMail {
    pub session_id: SessionId,
    pub sender_id: UserId,
    pub subject: String,
    pub content: String,
    pub content_type: String,
    pub to: Vec<UserId>,
    pub cc: Vec<UserId>,
    pub bcc: Vec<UserId>,
    pub parent_id: Option<MailId>,
}

/// A mail with its recipient links and attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mail {
    pub id: MailId,
    pub session_id: SessionId,
    pub sender_id: UserId,
    #[serde(skip)]
    pub sender_status: SenderStatus,
    pub subject: String,
    pub content: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MailId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub attachments: Vec<Attachment>,
    pub recipients: Vec<MailRecipient>,
}

impl Mail {
    /// Builds a mail ready to persist: every recipient starts `unread` and
    /// every attachment is linked to the new mail id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no recipient is given.
    pub fn compose(new: NewMail, attachments: Vec<Attachment>) -> Result<Self, DomainError> {
        if new.to.is_empty() && new.cc.is_empty() && new.bcc.is_empty() {
            return Err(ValidationError::empty_field("to").into());
        }

        let id = MailId::new();
        let now = Timestamp::now();

        let addressed = new
            .to
            .into_iter()
            .map(|u| (u, RecipientKind::To))
            .chain(new.cc.into_iter().map(|u| (u, RecipientKind::Cc)))
            .chain(new.bcc.into_iter().map(|u| (u, RecipientKind::Bcc)));

        let recipients = addressed
            .map(|(recipient_id, kind)| MailRecipient {
                id: RecipientLinkId::new(),
                mail_id: id,
                session_id: new.session_id.clone(),
                recipient_id,
                kind,
                status: RecipientStatus::Unread,
                read_at: None,
            })
            .collect();

        let attachments = attachments
            .into_iter()
            .map(|a| a.linked_to_mail(id))
            .collect();

        let content_type = if new.content_type.trim().is_empty() {
            "text".to_string()
        } else {
            new.content_type
        };

        Ok(Self {
            id,
            session_id: new.session_id,
            sender_id: new.sender_id,
            sender_status: SenderStatus::Normal,
            subject: new.subject,
            content: new.content,
            content_type,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
            attachments,
            recipients,
        })
    }

    /// Recipient ids in addressing order (to, cc, bcc).
    pub fn recipient_ids(&self) -> Vec<UserId> {
        self.recipients
            .iter()
            .map(|r| r.recipient_id.clone())
            .collect()
    }

    /// Returns the link for `user` if they are a recipient.
    pub fn link_for(&self, user: &UserId) -> Option<&MailRecipient> {
        self.recipients.iter().find(|r| &r.recipient_id == user)
    }

    /// True if `user` sent this mail.
    pub fn is_sent_by(&self, user: &UserId) -> bool {
        &self.sender_id == user
    }

    /// Links uploaded attachments to this mail.
    pub fn attach(&mut self, attachments: Vec<Attachment>) {
        let id = self.id;
        self.attachments
            .extend(attachments.into_iter().map(|a| a.linked_to_mail(id)));
    }

    /// Records that `user` has read their copy and returns the read time.
    /// `None` if the link was not unread.
    pub fn mark_read_by(&mut self, user: &UserId) -> Option<Timestamp> {
        let link = self
            .recipients
            .iter_mut()
            .find(|r| &r.recipient_id == user && r.status == RecipientStatus::Unread)?;
        let read_at = Timestamp::now();
        link.status = RecipientStatus::Read;
        link.read_at = Some(read_at);
        Some(read_at)
    }

    /// Compact description carried in live notifications.
    pub fn notification_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "subject": self.subject,
            "sender_id": self.sender_id,
        })
    }
}
