//! Filesystem locations for uploads and generated documents

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of the blob store; each session gets `{uploads_dir}/{session}`
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Root of the document store; each session gets `{documents_dir}/{session}/docs`
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Blank document served when a key has no saved version
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.uploads_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__UPLOADS_DIR"));
        }
        if self.documents_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DOCUMENTS_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            documents_dir: default_documents_dir(),
            template_path: default_template_path(),
        }
    }
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_template_path() -> PathBuf {
    PathBuf::from("./templates/empty.docx")
}
