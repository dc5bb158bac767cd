//! GetUserSummaryHandler - Unread counters for the header badges.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::ports::{MailRepository, UserSummary};

#[derive(Debug, Clone)]
pub struct GetUserSummaryQuery {
    pub session_id: SessionId,
    pub user_id: UserId,
}

pub struct GetUserSummaryHandler {
    repository: Arc<dyn MailRepository>,
}

impl GetUserSummaryHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetUserSummaryQuery) -> Result<UserSummary, DomainError> {
        let unread_mail_count = self
            .repository
            .unread_mail_count(&query.session_id, &query.user_id)
            .await?;
        let im_unread_counts = self
            .repository
            .im_unread_counts(&query.session_id, &query.user_id)
            .await?;

        Ok(UserSummary {
            unread_mail_count,
            im_unread_counts,
        })
    }
}
