//! HTTP adapter for mail endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{content_disposition, AttachmentResponse, MailResponse, MailboxResponse};
pub use routes::mail_routes;
