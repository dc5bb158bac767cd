//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Raven domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    is_path_segment, AttachmentId, ChatMessageId, MailId, RecipientLinkId, SessionId, UserId,
    DEFAULT_SESSION_ID,
};
pub use timestamp::Timestamp;
