//! SessionLifecycleManager - Deletes sessions and sweeps orphans.
//!
//! Deleting a session runs in two phases:
//! 1. One relational transaction removes the session's attachment,
//!    recipient-link, mail, and chat-message rows.
//! 2. Best effort removal of the session's blob and document subtrees.
//!    Failures here are logged and do not fail the call.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::{BlobStorage, DocumentStorage, SessionStore};

/// Sessions present in `stored` but not in `active`.
///
/// The empty and reserved default sessions are never orphans.
pub fn orphan_sessions(
    stored: &BTreeSet<SessionId>,
    active: &BTreeSet<SessionId>,
) -> BTreeSet<SessionId> {
    stored
        .difference(active)
        .filter(|id| !id.is_reserved())
        .cloned()
        .collect()
}

/// Coordinates deletion across the relational store and file stores.
pub struct SessionLifecycleManager {
    sessions: Arc<dyn SessionStore>,
    blobs: Arc<dyn BlobStorage>,
    documents: Arc<dyn DocumentStorage>,
}

impl SessionLifecycleManager {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        blobs: Arc<dyn BlobStorage>,
        documents: Arc<dyn DocumentStorage>,
    ) -> Self {
        Self {
            sessions,
            blobs,
            documents,
        }
    }

    /// Removes every trace of a session.
    ///
    /// The empty and reserved default sessions are a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns the store error if the relational phase fails; in that case no
    /// rows were removed and the file stores were not touched.
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<(), DomainError> {
        if session_id.is_reserved() {
            tracing::debug!(session_id = %session_id, "Skipping delete of reserved session");
            return Ok(());
        }

        let deleted = self.sessions.delete_session_rows(session_id).await?;
        tracing::info!(
            session_id = %session_id,
            attachments = deleted.attachments,
            recipients = deleted.recipients,
            mails = deleted.mails,
            chat_messages = deleted.chat_messages,
            "Deleted session rows"
        );

        if let Err(e) = self.blobs.delete_session_dir(session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to remove session uploads");
        }
        if let Err(e) = self.documents.delete_session_dir(session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to remove session documents");
        }

        Ok(())
    }

    /// Deletes every stored session not named in `active_ids`.
    ///
    /// Returns how many sessions were deleted. A session whose deletion fails
    /// is logged and skipped; it stays a candidate for the next sweep.
    ///
    /// # Errors
    ///
    /// Only if the stored session ids cannot be listed.
    pub async fn sync_sessions(
        &self,
        active_ids: impl IntoIterator<Item = SessionId>,
    ) -> Result<u64, DomainError> {
        let active: BTreeSet<SessionId> = active_ids.into_iter().collect();
        let stored = self.sessions.session_ids().await?;
        let orphans = orphan_sessions(&stored, &active);

        let mut deleted = 0u64;
        for session_id in &orphans {
            match self.delete_session(session_id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to delete orphan session");
                }
            }
        }

        tracing::info!(
            stored = stored.len(),
            active = active.len(),
            orphans = orphans.len(),
            deleted,
            "Session sync complete"
        );
        Ok(deleted)
    }
}
