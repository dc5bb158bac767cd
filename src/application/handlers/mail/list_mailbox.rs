//! ListMailboxHandler - Paged inbox and sent folder queries.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{MailPage, MailRepository, MailboxQuery};

/// Which folder to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Inbox,
    Sent,
}

pub struct ListMailboxHandler {
    repository: Arc<dyn MailRepository>,
}

impl ListMailboxHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, folder: Folder, query: &MailboxQuery) -> Result<MailPage, DomainError> {
        match folder {
            Folder::Inbox => self.repository.inbox(query).await,
            Folder::Sent => self.repository.sent(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMailStore;
    use crate::domain::foundation::{SessionId, UserId};
    use crate::domain::mail::{Mail, NewMail};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn pages_newest_first() {
        let store = Arc::new(InMemoryMailStore::new());
        for n in 0..5 {
            let mut mail = Mail::compose(
                NewMail {
                    session_id: SessionId::new("s1"),
                    sender_id: user("alice"),
                    subject: format!("mail {}", n),
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
            mail.created_at = crate::domain::foundation::Timestamp::from_datetime(
                chrono::Utc::now() + chrono::Duration::seconds(n),
            );
            store.create_mail(&mail).await.unwrap();
        }
        let handler = ListMailboxHandler::new(store);

        let query = MailboxQuery::new(SessionId::new("s1"), user("bob"), Some(2), Some(2), None);
        let page = handler.handle(Folder::Inbox, &query).await.unwrap();

        assert_eq!(page.total, 5);
        let subjects: Vec<&str> = page.mails.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["mail 2", "mail 1"]);

        let query = MailboxQuery::new(SessionId::new("s1"), user("alice"), None, None, None);
        assert_eq!(handler.handle(Folder::Sent, &query).await.unwrap().total, 5);
    }
}
