//! HTTP routes for document editor endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{editor_callback, force_save, serve_template};
use crate::adapters::http::state::AppState;

/// Document routes, mounted at `/documents`.
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/template", get(serve_template))
        .route("/callback", post(editor_callback))
        .route("/forcesave", post(force_save))
}
