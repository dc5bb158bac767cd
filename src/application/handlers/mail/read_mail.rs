//! ReadMailHandler - Loads a mail and marks the viewer's copy read.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MailId, SessionId, UserId};
use crate::domain::mail::{Mail, RecipientStatus};
use crate::ports::MailRepository;

#[derive(Debug, Clone)]
pub struct ReadMailQuery {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub mail_id: MailId,
}

/// Handler for opening a mail.
///
/// Only an `unread` link moves to `read`. Links already read or deleted are
/// left as they are, so re-opening a mail never resets `read_at`.
pub struct ReadMailHandler {
    repository: Arc<dyn MailRepository>,
}

impl ReadMailHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ReadMailQuery) -> Result<Mail, DomainError> {
        let mut mail = self
            .repository
            .find_mail(&query.session_id, query.mail_id)
            .await?;

        if let Some(read_at) = mail.mark_read_by(&query.user_id) {
            self.repository
                .update_recipient_status(
                    mail.id,
                    &query.user_id,
                    RecipientStatus::Read,
                    Some(read_at),
                )
                .await?;
            tracing::debug!(mail_id = %mail.id, user_id = %query.user_id, "Marked mail read");
        }

        Ok(mail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMailStore;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::mail::NewMail;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn stored_mail(store: &InMemoryMailStore) -> Mail {
        let mail = Mail::compose(
            NewMail {
                session_id: SessionId::new("s1"),
                sender_id: user("alice"),
                subject: "Hi".into(),
                content: String::new(),
                content_type: String::new(),
                to: vec![user("bob")],
                cc: vec![],
                bcc: vec![],
                parent_id: None,
            },
            vec![],
        )
        .unwrap();
        store.create_mail(&mail).await.unwrap();
        mail
    }

    fn query(user_id: &str, mail_id: MailId) -> ReadMailQuery {
        ReadMailQuery {
            session_id: SessionId::new("s1"),
            user_id: user(user_id),
            mail_id,
        }
    }

    #[tokio::test]
    async fn recipient_read_flips_unread_to_read() {
        let store = Arc::new(InMemoryMailStore::new());
        let mail = stored_mail(&store).await;
        let handler = ReadMailHandler::new(store.clone());

        let opened = handler.handle(query("bob", mail.id)).await.unwrap();

        assert_eq!(opened.link_for(&user("bob")).unwrap().status, RecipientStatus::Read);
        assert_eq!(store.unread_mail_count(&SessionId::new("s1"), &user("bob")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reopening_keeps_first_read_time() {
        let store = Arc::new(InMemoryMailStore::new());
        let mail = stored_mail(&store).await;
        let handler = ReadMailHandler::new(store.clone());

        let first = handler.handle(query("bob", mail.id)).await.unwrap();
        let second = handler.handle(query("bob", mail.id)).await.unwrap();
        let stored = store.find_mail(&SessionId::new("s1"), mail.id).await.unwrap();

        let first_read_at = first.link_for(&user("bob")).unwrap().read_at;
        assert!(first_read_at.is_some());
        assert_eq!(stored.link_for(&user("bob")).unwrap().read_at, first_read_at);
        assert_eq!(second.link_for(&user("bob")).unwrap().read_at, first_read_at);
    }

    #[tokio::test]
    async fn deleted_link_is_not_resurrected() {
        let store = Arc::new(InMemoryMailStore::new());
        let mail = stored_mail(&store).await;
        store
            .update_recipient_status(mail.id, &user("bob"), RecipientStatus::Deleted, None)
            .await
            .unwrap();
        let handler = ReadMailHandler::new(store.clone());

        let opened = handler.handle(query("bob", mail.id)).await.unwrap();

        assert_eq!(opened.link_for(&user("bob")).unwrap().status, RecipientStatus::Deleted);
    }

    #[tokio::test]
    async fn sender_view_changes_nothing() {
        let store = Arc::new(InMemoryMailStore::new());
        let mail = stored_mail(&store).await;
        let handler = ReadMailHandler::new(store.clone());

        handler.handle(query("alice", mail.id)).await.unwrap();

        assert_eq!(store.unread_mail_count(&SessionId::new("s1"), &user("bob")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_mail_is_not_found() {
        let store = Arc::new(InMemoryMailStore::new());
        let handler = ReadMailHandler::new(store);

        let err = handler.handle(query("bob", MailId::new())).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::MailNotFound);
    }
}
