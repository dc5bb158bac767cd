//! HTTP routes for session endpoints.

use axum::{
    routing::{delete, post},
    Router,
};

use super::handlers::{delete_session, sync_sessions};
use crate::adapters::http::state::AppState;

/// Session routes, mounted at `/sessions`.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync_sessions))
        .route("/:id", delete(delete_session))
}
