//! HTTP DTOs for document editor endpoints.

use serde::{Deserialize, Serialize};

/// Editor finished editing and the document is ready to save.
pub const STATUS_READY_FOR_SAVE: i64 = 2;
/// Editor force-saved while editing continues.
pub const STATUS_FORCE_SAVED: i64 = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateParams {
    pub key: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub session_id: Option<String>,
}

/// Status callback posted by the document editor.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRequest {
    pub status: i64,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CallbackRequest {
    /// True when the callback carries a document version to store.
    pub fn carries_document(&self) -> bool {
        matches!(self.status, STATUS_READY_FOR_SAVE | STATUS_FORCE_SAVED)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForceSaveParams {
    pub key: Option<String>,
}

/// Command sent to the editor's command service.
#[derive(Debug, Clone, Serialize)]
pub struct EditorCommand<'a> {
    pub c: &'static str,
    pub key: &'a str,
}

/// Reply shape the editor expects: `error` is 0 on success, 1 on failure.
#[derive(Debug, Clone, Serialize)]
pub struct EditorReply {
    pub error: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EditorReply {
    pub fn ok() -> Self {
        Self {
            error: 0,
            message: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            error: 1,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_save_statuses_carry_documents() {
        let parse = |json: &str| serde_json::from_str::<CallbackRequest>(json).unwrap();
        assert!(parse(r#"{"status": 2, "key": "k", "url": "http://x"}"#).carries_document());
        assert!(parse(r#"{"status": 6, "key": "k", "url": "http://x"}"#).carries_document());
        assert!(!parse(r#"{"status": 1, "key": "k"}"#).carries_document());
        assert!(!parse(r#"{"status": 4}"#).carries_document());
    }

    #[test]
    fn reply_serializes_error_flag() {
        let json = serde_json::to_value(EditorReply::failed().with_message("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"error": 1, "message": "boom"}));
        assert_eq!(
            serde_json::to_value(EditorReply::ok()).unwrap(),
            serde_json::json!({"error": 0})
        );
    }
}
