//! HTTP DTOs for mail endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::mail::{Attachment, Mail, RecipientKind};
use crate::ports::MailboxQuery;

/// Query parameters for inbox and sent listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailboxParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub q: Option<String>,
}

impl MailboxParams {
    pub fn into_query(self, session_id: SessionId, user_id: UserId) -> MailboxQuery {
        MailboxQuery::new(session_id, user_id, self.page, self.page_size, self.q)
    }
}

/// Query parameters for attachment download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadParams {
    pub id: Option<String>,
    pub disposition: Option<String>,
}

impl DownloadParams {
    pub fn is_inline(&self) -> bool {
        self.disposition.as_deref() == Some("inline")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentResponse {
    pub id: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
}

impl From<&Attachment> for AttachmentResponse {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.to_string(),
            file_name: attachment.file_name.clone(),
            file_size: attachment.file_size,
            mime_type: attachment.mime_type.clone(),
        }
    }
}

/// A mail as seen by one user.
///
/// Bcc recipients are listed only for the sender.
#[derive(Debug, Clone, Serialize)]
pub struct MailResponse {
    pub id: String,
    pub session_id: String,
    pub sender_id: String,
    pub subject: String,
    pub content: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    /// Viewer's recipient status; absent for the sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub attachments: Vec<AttachmentResponse>,
    pub created_at: String,
}

impl MailResponse {
    pub fn for_viewer(mail: &Mail, viewer: &UserId) -> Self {
        let addressed = |kind: RecipientKind| -> Vec<String> {
            mail.recipients
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.recipient_id.to_string())
                .collect()
        };
        let bcc = if mail.is_sent_by(viewer) {
            addressed(RecipientKind::Bcc)
        } else {
            Vec::new()
        };

        Self {
            id: mail.id.to_string(),
            session_id: mail.session_id.to_string(),
            sender_id: mail.sender_id.to_string(),
            subject: mail.subject.clone(),
            content: mail.content.clone(),
            content_type: mail.content_type.clone(),
            parent_id: mail.parent_id.map(|id| id.to_string()),
            to: addressed(RecipientKind::To),
            cc: addressed(RecipientKind::Cc),
            bcc,
            status: mail
                .link_for(viewer)
                .map(|link| link.status.as_str().to_string()),
            attachments: mail.attachments.iter().map(Into::into).collect(),
            created_at: mail.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// One page of a mailbox listing.
#[derive(Debug, Clone, Serialize)]
pub struct MailboxResponse {
    pub data: Vec<MailResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub session_id: String,
}

/// `Content-Disposition` value with an ASCII fallback name and an RFC 5987
/// encoded UTF-8 name.
pub fn content_disposition(file_name: &str, inline: bool) -> String {
    let kind = if inline { "inline" } else { "attachment" };
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        kind,
        ascii_fallback(file_name),
        rfc5987_encode(file_name)
    )
}

fn ascii_fallback(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            let keep = c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\');
            if keep {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn rfc5987_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        let attr_char = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
            );
        if attr_char {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mail::NewMail;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn mail() -> Mail {
        Mail::compose(
            NewMail {
                session_id: SessionId::new("s1"),
                sender_id: user("alice"),
                subject: "Plan".into(),
                content: "body".into(),
                content_type: String::new(),
                to: vec![user("bob")],
                cc: vec![user("carol")],
                bcc: vec![user("dave")],
                parent_id: None,
            },
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn bcc_is_visible_to_sender_only() {
        let mail = mail();

        let for_sender = MailResponse::for_viewer(&mail, &user("alice"));
        assert_eq!(for_sender.bcc, vec!["dave".to_string()]);
        assert!(for_sender.status.is_none());

        let for_bob = MailResponse::for_viewer(&mail, &user("bob"));
        assert!(for_bob.bcc.is_empty());
        assert_eq!(for_bob.to, vec!["bob".to_string()]);
        assert_eq!(for_bob.cc, vec!["carol".to_string()]);
        assert_eq!(for_bob.status.as_deref(), Some("unread"));
    }

    #[test]
    fn disposition_encodes_non_ascii_names() {
        let header = content_disposition("报告 v2.pdf", false);
        assert_eq!(
            header,
            "attachment; filename=\"__ v2.pdf\"; filename*=UTF-8''%E6%8A%A5%E5%91%8A%20v2.pdf"
        );
    }

    #[test]
    fn inline_disposition() {
        assert!(content_disposition("a.png", true).starts_with("inline; "));
    }

    #[test]
    fn quotes_are_replaced_in_fallback() {
        assert_eq!(ascii_fallback("a\"b.txt"), "a_b.txt");
    }
}
