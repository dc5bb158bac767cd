//! Document editor server settings

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentServerConfig {
    /// `host[:port]` of the document editor, without scheme
    #[serde(default = "default_host")]
    pub host: String,
}

impl DocumentServerConfig {
    /// Endpoint accepting editor commands such as `forcesave`.
    pub fn command_url(&self) -> String {
        format!("http://{}/coauthoring/CommandService.ashx", self.host)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DOCUMENT_SERVER__HOST"));
        }
        if self.host.contains("://") {
            return Err(ValidationError::InvalidDocumentServerHost(self.host.clone()));
        }
        Ok(())
    }
}

impl Default for DocumentServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

fn default_host() -> String {
    "localhost:8090".to_string()
}
