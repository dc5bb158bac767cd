//! Multipart form reading for send endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use super::error::ApiError;
use crate::application::UploadedFile;
use crate::domain::foundation::{DomainError, UserId};

/// Field name carrying uploaded files. `attachments[]` is accepted too.
const ATTACHMENTS_FIELD: &str = "attachments";

/// Text fields and uploaded files of one multipart body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name.trim_end_matches("[]") == ATTACHMENTS_FIELD {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.files
                    .push(UploadedFile::new(file_name, mime_type, bytes.to_vec()));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Text field, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Comma-separated user ids, blanks skipped.
    pub fn user_list(&self, name: &str) -> Result<Vec<UserId>, ApiError> {
        split_user_ids(self.fields.get(name).map(String::as_str).unwrap_or_default())
    }
}

pub fn split_user_ids(raw: &str) -> Result<Vec<UserId>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| UserId::new(s).map_err(|e| ApiError::Domain(DomainError::from(e))))
        .collect()
}
