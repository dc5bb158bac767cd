//! In-memory adapters for tests and local development.

mod in_memory_blob_storage;
mod in_memory_mail_store;

pub use in_memory_blob_storage::InMemoryBlobStorage;
pub use in_memory_mail_store::{
    InMemoryMailStore, ATTACHMENTS_TABLE, CHAT_MESSAGES_TABLE, MAILS_TABLE, RECIPIENTS_TABLE,
};
