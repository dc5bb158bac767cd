//! DeleteMailHandler - Hides a mail from the caller's folder.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MailId, SessionId, UserId};
use crate::domain::mail::RecipientStatus;
use crate::ports::MailRepository;

#[derive(Debug, Clone)]
pub struct DeleteMailCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub mail_id: MailId,
}

/// Handler for deleting a mail.
///
/// Deletion is per viewer: the sender hides it from their sent folder, a
/// recipient hides their own copy. Rows are never removed here.
pub struct DeleteMailHandler {
    repository: Arc<dyn MailRepository>,
}

impl DeleteMailHandler {
    pub fn new(repository: Arc<dyn MailRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteMailCommand) -> Result<(), DomainError> {
        let mail = self
            .repository
            .find_mail(&cmd.session_id, cmd.mail_id)
            .await?;

        if mail.is_sent_by(&cmd.user_id) {
            self.repository.delete_for_sender(mail.id).await
        } else {
            self.repository
                .update_recipient_status(mail.id, &cmd.user_id, RecipientStatus::Deleted, None)
                .await?;
            Ok(())
        }
    }
}
