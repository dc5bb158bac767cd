//! Shared application state and handler construction.

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    ChatHistoryHandler, DeleteMailHandler, GetAttachmentHandler, GetUserSummaryHandler,
    ListMailboxHandler, MarkChatReadHandler, Notifier, ReadMailHandler, SendChatMessageHandler,
    SendMailHandler, SessionLifecycleManager,
};
use crate::domain::foundation::UserId;
use crate::ports::{BlobStorage, DocumentStorage, EventSubscriber, MailRepository, SessionStore};

/// Settings the HTTP layer reads per request.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// User assumed when a request carries no `user_id`.
    pub default_user_id: UserId,
    /// Interval between SSE keep-alive comments.
    pub keep_alive: Duration,
    /// Blank document served for keys without a saved version.
    pub template_path: std::path::PathBuf,
    /// Editor command endpoint used by `forcesave`.
    pub document_command_url: String,
}

/// State shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub mail_repository: Arc<dyn MailRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub blobs: Arc<dyn BlobStorage>,
    pub documents: Arc<dyn DocumentStorage>,
    pub subscriber: Arc<dyn EventSubscriber>,
    pub notifier: Notifier,
    pub http_client: reqwest::Client,
    pub settings: Arc<HttpSettings>,
}

impl AppState {
    pub fn send_mail_handler(&self) -> SendMailHandler {
        SendMailHandler::new(
            self.mail_repository.clone(),
            self.blobs.clone(),
            self.notifier.clone(),
        )
    }

    pub fn read_mail_handler(&self) -> ReadMailHandler {
        ReadMailHandler::new(self.mail_repository.clone())
    }

    pub fn delete_mail_handler(&self) -> DeleteMailHandler {
        DeleteMailHandler::new(self.mail_repository.clone())
    }

    pub fn list_mailbox_handler(&self) -> ListMailboxHandler {
        ListMailboxHandler::new(self.mail_repository.clone())
    }

    pub fn get_attachment_handler(&self) -> GetAttachmentHandler {
        GetAttachmentHandler::new(self.mail_repository.clone(), self.blobs.clone())
    }

    pub fn send_chat_message_handler(&self) -> SendChatMessageHandler {
        SendChatMessageHandler::new(
            self.mail_repository.clone(),
            self.blobs.clone(),
            self.notifier.clone(),
        )
    }

    pub fn chat_history_handler(&self) -> ChatHistoryHandler {
        ChatHistoryHandler::new(self.mail_repository.clone())
    }

    pub fn mark_chat_read_handler(&self) -> MarkChatReadHandler {
        MarkChatReadHandler::new(self.mail_repository.clone())
    }

    pub fn user_summary_handler(&self) -> GetUserSummaryHandler {
        GetUserSummaryHandler::new(self.mail_repository.clone())
    }

    pub fn session_lifecycle(&self) -> SessionLifecycleManager {
        SessionLifecycleManager::new(
            self.session_store.clone(),
            self.blobs.clone(),
            self.documents.clone(),
        )
    }
}
