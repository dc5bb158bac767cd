//! HTTP routes for mail endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{delete_mail, download_attachment, get_mail, inbox, send_mail, sent};
use crate::adapters::http::state::AppState;
use crate::adapters::http::stream::stream_events;

/// Mail routes, mounted at `/mails`.
///
/// - `POST /send` - Send a mail (multipart)
/// - `GET /inbox`, `GET /sent` - Paged folders
/// - `GET /download?id=` - Attachment content
/// - `GET /events` - Live notification stream
/// - `GET /:id`, `DELETE /:id` - Read or delete one mail
pub fn mail_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_mail))
        .route("/inbox", get(inbox))
        .route("/sent", get(sent))
        .route("/download", get(download_attachment))
        .route("/events", get(stream_events))
        .route("/:id", get(get_mail).delete(delete_mail))
}
