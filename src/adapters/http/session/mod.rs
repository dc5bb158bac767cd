//! HTTP adapter for session lifecycle endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{SyncSessionsRequest, SyncSessionsResponse};
pub use routes::session_routes;
