//! HTTP handlers for the document editor integration.
//!
//! The editor loads documents from `template`, reports saves through
//! `callback`, and can be asked to save immediately through `forcesave`.

use std::path::{Path, PathBuf};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use thiserror::Error;

use super::dto::{
    CallbackParams, CallbackRequest, EditorCommand, EditorReply, ForceSaveParams, TemplateParams,
};
use crate::adapters::http::context::SessionHeader;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::StorageError;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_DISPOSITION: &str = "attachment; filename=document.docx";

#[derive(Debug, Error)]
enum CallbackError {
    #[error("callback is missing '{0}'")]
    MissingField(&'static str),

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("save failed: {0}")]
    Storage(#[from] StorageError),
}

/// Query parameter first, then the session header, then the default session.
fn session_for(query: Option<&str>, headers: &HeaderMap) -> SessionId {
    match query.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => SessionId::new(id),
        None => SessionHeader::from_headers(headers).0,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn read_template(path: &Path) -> Result<Vec<u8>, DomainError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| StorageError::from_io(e, path.display().to_string()).into())
}

/// GET /api/v1/documents/template?key=&session_id= - Saved document or blank template
pub async fn serve_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TemplateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = session_for(params.session_id.as_deref(), &headers);

    let saved = match non_blank(params.key.as_deref()) {
        Some(key) => match state.documents.load(&session_id, key).await {
            Ok(bytes) => Some(bytes),
            Err(StorageError::NotFound { .. }) => None,
            Err(err) => return Err(ApiError::Domain(err.into())),
        },
        None => None,
    };

    let bytes = match saved {
        Some(bytes) => bytes,
        None => {
            tracing::debug!(session_id = %session_id, key = ?params.key, "Serving blank template");
            read_template(&state.settings.template_path).await?
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME),
            (header::CONTENT_DISPOSITION, DOCX_DISPOSITION),
        ],
        bytes,
    ))
}

async fn store_edited_document(
    state: &AppState,
    session_id: &SessionId,
    req: &CallbackRequest,
) -> Result<PathBuf, CallbackError> {
    let key = non_blank(req.key.as_deref()).ok_or(CallbackError::MissingField("key"))?;
    let url = non_blank(req.url.as_deref()).ok_or(CallbackError::MissingField("url"))?;

    let bytes = state
        .http_client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    Ok(state.documents.save(session_id, key, &bytes).await?)
}

/// POST /api/v1/documents/callback?session_id= - Editor status callback
///
/// Always answers in the editor's `{error}` shape. Save failures are logged.
pub async fn editor_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
    body: Result<Json<CallbackRequest>, JsonRejection>,
) -> (StatusCode, Json<EditorReply>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed editor callback");
            return (StatusCode::BAD_REQUEST, Json(EditorReply::failed()));
        }
    };
    tracing::info!(status = req.status, key = ?req.key, "Editor callback received");

    if !req.carries_document() {
        return (StatusCode::OK, Json(EditorReply::ok()));
    }

    let session_id = session_for(params.session_id.as_deref(), &headers);
    match store_edited_document(&state, &session_id, &req).await {
        Ok(path) => {
            tracing::info!(
                session_id = %session_id,
                status = req.status,
                path = %path.display(),
                "Edited document stored"
            );
            (StatusCode::OK, Json(EditorReply::ok()))
        }
        Err(err) => {
            tracing::warn!(session_id = %session_id, error = %err, "Edited document not stored");
            (StatusCode::OK, Json(EditorReply::failed()))
        }
    }
}

/// POST /api/v1/documents/forcesave?key= - Ask the editor to save now
pub async fn force_save(
    State(state): State<AppState>,
    Query(params): Query<ForceSaveParams>,
) -> (StatusCode, Json<EditorReply>) {
    let Some(key) = non_blank(params.key.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(EditorReply::failed().with_message("missing key")),
        );
    };

    let command = EditorCommand {
        c: "forcesave",
        key,
    };
    let result = state
        .http_client
        .post(&state.settings.document_command_url)
        .json(&command)
        .send()
        .await
        .and_then(|resp| resp.error_for_status());

    match result {
        Ok(_) => {
            tracing::info!(key, "Force save triggered");
            (
                StatusCode::OK,
                Json(EditorReply::ok().with_message("forcesave triggered")),
            )
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "Force save request failed");
            (
                StatusCode::OK,
                Json(EditorReply::failed().with_message(err.to_string())),
            )
        }
    }
}
