//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;
pub mod mail;
pub mod session;
pub mod uploads;
pub mod user;

pub use chat::{
    ChatHistoryHandler, ChatHistoryQuery, MarkChatReadCommand, MarkChatReadHandler,
    SendChatMessageCommand, SendChatMessageHandler,
};
pub use mail::{
    AttachmentContent, DeleteMailCommand, DeleteMailHandler, Folder, GetAttachmentHandler,
    GetAttachmentQuery, ListMailboxHandler, ReadMailHandler, ReadMailQuery, SendMailCommand,
    SendMailHandler,
};
pub use session::{orphan_sessions, SessionLifecycleManager};
pub use uploads::UploadedFile;
pub use user::{GetUserSummaryHandler, GetUserSummaryQuery};
