//! Mail command and query handlers.

mod delete_mail;
mod get_attachment;
mod list_mailbox;
mod read_mail;
mod send_mail;

pub use delete_mail::{DeleteMailCommand, DeleteMailHandler};
pub use get_attachment::{AttachmentContent, GetAttachmentHandler, GetAttachmentQuery};
pub use list_mailbox::{Folder, ListMailboxHandler};
pub use read_mail::{ReadMailHandler, ReadMailQuery};
pub use send_mail::{SendMailCommand, SendMailHandler};
