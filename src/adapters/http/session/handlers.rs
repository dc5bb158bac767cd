//! HTTP handlers for session endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{SyncSessionsRequest, SyncSessionsResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::SessionId;

/// DELETE /api/v1/sessions/:id - Remove every record and file of a session
///
/// The reserved default session is accepted and left untouched.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .session_lifecycle()
        .delete_session(&SessionId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/sync - Delete every stored session not listed as active
pub async fn sync_sessions(
    State(state): State<AppState>,
    Json(req): Json<SyncSessionsRequest>,
) -> Result<Json<SyncSessionsResponse>, ApiError> {
    let deleted = state
        .session_lifecycle()
        .sync_sessions(req.active())
        .await?;
    Ok(Json(SyncSessionsResponse { deleted }))
}
