//! Mail module - mail, chat, and attachment records scoped by session.

mod attachment;
mod chat;
mod mail;

pub use attachment::Attachment;
pub use chat::ChatMessage;
pub use mail::{Mail, MailRecipient, NewMail, RecipientKind, RecipientStatus, SenderStatus};
