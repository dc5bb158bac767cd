//! PostgreSQL implementation of SessionStore.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::{SessionRowsDeleted, SessionStore};

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn session_ids(&self) -> Result<BTreeSet<SessionId>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT session_id FROM mails
            UNION SELECT session_id FROM mail_recipients
            UNION SELECT session_id FROM attachments
            UNION SELECT session_id FROM chat_messages
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list sessions: {}", e)))?;

        Ok(rows.into_iter().map(|(id,)| SessionId::new(id)).collect())
    }

    async fn delete_session_rows(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionRowsDeleted, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        let mut deleted = SessionRowsDeleted::default();

        // Children first: attachments and links reference mails by id
        for (table, counter) in [
            ("attachments", &mut deleted.attachments),
            ("mail_recipients", &mut deleted.recipients),
            ("mails", &mut deleted.mails),
            ("chat_messages", &mut deleted.chat_messages),
        ] {
            let result = sqlx::query(&format!("DELETE FROM {} WHERE session_id = $1", table))
                .bind(session_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to delete {}: {}", table, e))
                        .with_detail("session_id", session_id.as_str())
                })?;
            *counter = result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit session deletion: {}", e))
        })?;

        Ok(deleted)
    }
}
