//! HTTP handlers for mail endpoints.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use super::dto::{content_disposition, DownloadParams, MailResponse, MailboxParams, MailboxResponse};
use crate::adapters::http::context::RequestContext;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::form::FormData;
use crate::adapters::http::state::AppState;
use crate::application::{
    DeleteMailCommand, Folder, GetAttachmentQuery, ReadMailQuery, SendMailCommand,
};
use crate::domain::foundation::{AttachmentId, MailId};
use crate::domain::mail::NewMail;

fn parse_mail_id(raw: &str) -> Result<MailId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid mail id: {}", raw)))
}

/// POST /api/v1/mails/send - Compose and send a mail (multipart)
pub async fn send_mail(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormData::read(multipart).await?;
    let parent_id = form.optional("parent_id").map(parse_mail_id).transpose()?;

    let cmd = SendMailCommand {
        mail: NewMail {
            session_id: ctx.session_id,
            sender_id: ctx.user_id.clone(),
            subject: form.text("subject"),
            content: form.text("content"),
            content_type: form.text("content_type"),
            to: form.user_list("to")?,
            cc: form.user_list("cc")?,
            bcc: form.user_list("bcc")?,
            parent_id,
        },
        files: form.files,
    };

    let mail = state.send_mail_handler().handle(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(MailResponse::for_viewer(&mail, &ctx.user_id)),
    ))
}

async fn list(
    state: AppState,
    ctx: RequestContext,
    params: MailboxParams,
    folder: Folder,
) -> Result<Json<MailboxResponse>, ApiError> {
    let query = params.into_query(ctx.session_id.clone(), ctx.user_id.clone());
    let page = state.list_mailbox_handler().handle(folder, &query).await?;

    Ok(Json(MailboxResponse {
        data: page
            .mails
            .iter()
            .map(|mail| MailResponse::for_viewer(mail, &ctx.user_id))
            .collect(),
        total: page.total,
        page: query.page,
        page_size: query.page_size,
        session_id: ctx.session_id.to_string(),
    }))
}

/// GET /api/v1/mails/inbox - Mails addressed to the user
pub async fn inbox(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<MailboxParams>,
) -> Result<Json<MailboxResponse>, ApiError> {
    list(state, ctx, params, Folder::Inbox).await
}

/// GET /api/v1/mails/sent - Mails sent by the user
pub async fn sent(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<MailboxParams>,
) -> Result<Json<MailboxResponse>, ApiError> {
    list(state, ctx, params, Folder::Sent).await
}

/// GET /api/v1/mails/:id - Read a mail, marking it read for the user
pub async fn get_mail(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<MailResponse>, ApiError> {
    let query = ReadMailQuery {
        session_id: ctx.session_id,
        user_id: ctx.user_id.clone(),
        mail_id: parse_mail_id(&id)?,
    };
    let mail = state.read_mail_handler().handle(query).await?;
    Ok(Json(MailResponse::for_viewer(&mail, &ctx.user_id)))
}

/// DELETE /api/v1/mails/:id - Remove a mail from the user's view
pub async fn delete_mail(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let cmd = DeleteMailCommand {
        session_id: ctx.session_id,
        user_id: ctx.user_id,
        mail_id: parse_mail_id(&id)?,
    };
    state.delete_mail_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/mails/download?id= - Attachment content
pub async fn download_attachment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_id = params
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Attachment ID required".to_string()))?;
    let attachment_id: AttachmentId = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid attachment id: {}", raw_id)))?;

    let content = state
        .get_attachment_handler()
        .handle(GetAttachmentQuery {
            session_id: ctx.session_id,
            attachment_id,
        })
        .await?;

    let disposition = content_disposition(&content.attachment.file_name, params.is_inline());
    Ok((
        [
            (header::CONTENT_TYPE, content.attachment.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content.bytes,
    ))
}
