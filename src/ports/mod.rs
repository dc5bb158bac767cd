//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Fan a live notification out to subscribers
//! - `EventSubscriber` - Open and close subscriber queues
//!
//! ## Persistence Ports
//!
//! - `MailRepository` - Mail, chat, and attachment rows
//! - `SessionStore` - Session-wide listing and deletion
//! - `BlobStorage` - Uploaded attachment content
//! - `DocumentStorage` - Files saved by the document editor

mod blob_storage;
mod document_storage;
mod event_publisher;
mod event_subscriber;
mod mail_repository;
mod session_store;

pub use blob_storage::{BlobStorage, StorageError};
pub use document_storage::DocumentStorage;
pub use event_publisher::{EventPublisher, PublishReport};
pub use event_subscriber::{EventSubscriber, Subscription, SubscriptionId};
pub use mail_repository::{
    MailRepository, MailPage, MailboxQuery, UserSummary, CHAT_HISTORY_LIMIT, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use session_store::{SessionRowsDeleted, SessionStore};
