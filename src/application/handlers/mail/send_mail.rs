//! SendMailHandler - Command handler for composing and sending mail.

use std::sync::Arc;

use crate::application::handlers::uploads::{store_uploads, UploadedFile};
use crate::application::Notifier;
use crate::domain::foundation::DomainError;
use crate::domain::mail::{Mail, NewMail};
use crate::ports::{BlobStorage, MailRepository};

/// Command to send a mail.
#[derive(Debug, Clone)]
pub struct SendMailCommand {
    pub mail: NewMail,
    pub files: Vec<UploadedFile>,
}

/// Handler for sending mail.
///
/// Order: validate, upload attachments, persist, notify. An upload failure
/// stops before anything is written; a write failure stops before any event.
pub struct SendMailHandler {
    repository: Arc<dyn MailRepository>,
    blobs: Arc<dyn BlobStorage>,
    notifier: Notifier,
}

impl SendMailHandler {
    pub fn new(
        repository: Arc<dyn MailRepository>,
        blobs: Arc<dyn BlobStorage>,
        notifier: Notifier,
    ) -> Self {
        Self {
            repository,
            blobs,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: SendMailCommand) -> Result<Mail, DomainError> {
        let session_id = cmd.mail.session_id.clone();
        let mut mail = Mail::compose(cmd.mail, Vec::new())?;

        let attachments = store_uploads(self.blobs.as_ref(), &session_id, cmd.files).await?;
        mail.attach(attachments);

        self.repository.create_mail(&mail).await?;
        tracing::info!(
            session_id = %mail.session_id,
            mail_id = %mail.id,
            recipients = mail.recipients.len(),
            attachments = mail.attachments.len(),
            "Mail sent"
        );

        self.notifier.mail_created(&mail);
        Ok(mail)
    }
}
