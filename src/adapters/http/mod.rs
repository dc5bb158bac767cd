//! HTTP adapter - REST and SSE API under `/api/v1`.
//!
//! ```text
//! /api/v1/mails/...      send, folders, read, delete, download, events (SSE)
//! /api/v1/chat/...       send, history, read
//! /api/v1/users/summary  unread counters
//! /api/v1/sessions/...   delete one, sync against the active list
//! /api/v1/documents/...  editor template, callback, forcesave
//! ```

pub mod chat;
pub mod context;
pub mod documents;
pub mod error;
pub mod form;
pub mod mail;
pub mod session;
pub mod state;
pub mod stream;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use context::{RequestContext, SessionHeader, SESSION_HEADER};
pub use error::{ApiError, ErrorResponse};
pub use state::{AppState, HttpSettings};

/// Upper bound on request bodies, attachments included.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Cross-cutting settings for the router layers.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub request_timeout: Duration,
    /// Allowed origins; empty allows any origin.
    pub cors_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("content-disposition")])
}

/// Routes without layers, for mounting under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/mails", mail::mail_routes())
        .nest("/chat", chat::chat_routes())
        .nest("/users", chat::user_routes())
        .nest("/sessions", session::session_routes())
        .nest("/documents", documents::document_routes())
}

/// Complete application router.
pub fn router(state: AppState, settings: &RouterSettings) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
