//! Request context extractors.
//!
//! Every route is scoped by the `X-Session-ID` header and acts as the user
//! named by the `user_id` query parameter. There is no authentication; both
//! fall back to defaults when absent.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap},
};
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::foundation::{DomainError, SessionId, UserId};

pub const SESSION_HEADER: &str = "X-Session-ID";

/// Session named by the request header, or the reserved default session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHeader(pub SessionId);

impl SessionHeader {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let raw = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
        SessionHeader(SessionId::from_header(raw))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHeader
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionHeader::from_headers(&parts.headers))
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserParam {
    user_id: Option<String>,
}

/// `user_id` query parameter, `None` when missing or blank.
pub(crate) fn requested_user(parts: &Parts) -> Result<Option<UserId>, ApiError> {
    let Query(param) = Query::<UserParam>::try_from_uri(&parts.uri)
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    match param.user_id {
        Some(raw) if !raw.trim().is_empty() => UserId::new(raw.trim())
            .map(Some)
            .map_err(|e| ApiError::Domain(DomainError::from(e))),
        _ => Ok(None),
    }
}

/// Session and acting user of a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: SessionId,
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionHeader(session_id) = SessionHeader::from_headers(&parts.headers);
        let user_id = requested_user(parts)?
            .unwrap_or_else(|| state.settings.default_user_id.clone());
        Ok(RequestContext {
            session_id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::state::test_support::test_app;
    use axum::http::Request;

    fn parts(uri: &str, session: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn defaults_apply_without_header_or_param() {
        let app = test_app();
        let mut parts = parts("/api/v1/mails/inbox", None);

        let ctx = RequestContext::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert!(ctx.session_id.is_reserved());
        assert_eq!(ctx.user_id.as_str(), "guest");
    }

    #[tokio::test]
    async fn header_and_param_are_used() {
        let app = test_app();
        let mut parts = parts("/api/v1/mails/inbox?user_id=bob&page=2", Some("s1"));

        let ctx = RequestContext::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap();

        assert_eq!(ctx.session_id.as_str(), "s1");
        assert_eq!(ctx.user_id.as_str(), "bob");
    }

    #[test]
    fn blank_user_param_counts_as_missing() {
        let parts = parts("/x?user_id=%20", None);
        assert!(requested_user(&parts).unwrap().is_none());
    }
}
