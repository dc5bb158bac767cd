//! HTTP DTOs for session endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

/// Sessions the caller still considers live.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSessionsRequest {
    #[serde(default)]
    pub active_session_ids: Vec<String>,
}

impl SyncSessionsRequest {
    pub fn active(self) -> Vec<SessionId> {
        self.active_session_ids
            .into_iter()
            .map(SessionId::new)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSessionsResponse {
    /// Orphan sessions removed by this call.
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_means_no_active_sessions() {
        let req: SyncSessionsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.active().is_empty());
    }

    #[test]
    fn ids_are_kept_verbatim() {
        let req: SyncSessionsRequest =
            serde_json::from_str(r#"{"active_session_ids": ["s1", "s2"]}"#).unwrap();
        let ids: Vec<String> = req.active().iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }
}
