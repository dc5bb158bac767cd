//! HTTP adapter for chat and per-user counters.

mod dto;
mod handlers;
mod routes;

pub use dto::ChatMessageResponse;
pub use routes::{chat_routes, user_routes};
