//! HTTP adapter for the document editor webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{CallbackRequest, EditorReply};
pub use routes::document_routes;
