//! HTTP handlers for chat and user summary endpoints.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{ChatMessageResponse, MarkReadResponse, PeerParams};
use crate::adapters::http::context::RequestContext;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::form::FormData;
use crate::adapters::http::state::AppState;
use crate::application::{
    ChatHistoryQuery, GetUserSummaryQuery, MarkChatReadCommand, SendChatMessageCommand,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UserSummary;

fn peer(params: &PeerParams) -> Result<UserId, ApiError> {
    UserId::new(params.peer_id.trim()).map_err(|e| ApiError::Domain(DomainError::from(e)))
}

/// POST /api/v1/chat/send - Send a direct message (multipart)
pub async fn send_message(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormData::read(multipart).await?;
    let receiver_id = UserId::new(form.text("receiver_id").trim())
        .map_err(|e| ApiError::Domain(DomainError::from(e)))?;

    let cmd = SendChatMessageCommand {
        session_id: ctx.session_id,
        sender_id: ctx.user_id,
        receiver_id,
        content: form.text("content"),
        files: form.files,
    };
    let message = state.send_chat_message_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(ChatMessageResponse::from(&message))))
}

/// GET /api/v1/chat/history?peer_id= - Conversation with one peer, oldest first
pub async fn history(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<PeerParams>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let query = ChatHistoryQuery {
        session_id: ctx.session_id,
        user_id: ctx.user_id,
        peer_id: peer(&params)?,
    };
    let messages = state.chat_history_handler().handle(query).await?;
    Ok(Json(messages.iter().map(Into::into).collect()))
}

/// POST /api/v1/chat/read?peer_id= - Mark the peer's messages to the user read
pub async fn mark_read(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<PeerParams>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let cmd = MarkChatReadCommand {
        session_id: ctx.session_id,
        user_id: ctx.user_id,
        peer_id: peer(&params)?,
    };
    let updated = state.mark_chat_read_handler().handle(cmd).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// GET /api/v1/users/summary - Unread mail and chat counters
pub async fn user_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<UserSummary>, ApiError> {
    let summary = state
        .user_summary_handler()
        .handle(GetUserSummaryQuery {
            session_id: ctx.session_id,
            user_id: ctx.user_id,
        })
        .await?;
    Ok(Json(summary))
}
