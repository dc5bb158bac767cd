//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{history, mark_read, send_message, user_summary};
use crate::adapters::http::state::AppState;

/// Chat routes, mounted at `/chat`.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_message))
        .route("/history", get(history))
        .route("/read", post(mark_read))
}

/// User routes, mounted at `/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/summary", get(user_summary))
}
