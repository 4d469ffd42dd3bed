//! PostgreSQL session store.
//!
//! Persists each session as a single JSONB record. A turn always
//! rewrites the whole record in one statement, which gives the
//! all-or-nothing write the port requires without multi-table
//! transactions.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// PostgreSQL implementation of [`SessionStore`].
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new store over the given pool.
    ///
    /// Expects the `advisory_sessions` table from the migrations:
    /// `(session_id UUID PRIMARY KEY, record JSONB NOT NULL,
    /// updated_at TIMESTAMPTZ NOT NULL)`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn get(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError> {
        let row = sqlx::query("SELECT record FROM advisory_sessions WHERE session_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                SessionStoreError::Database(format!("Failed to fetch session: {}", e))
            })?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let record: serde_json::Value = row.get("record");
        let session: Session = serde_json::from_value(record)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;

        Ok(Some(session))
    }

    async fn put(&self, session: &Session) -> Result<(), SessionStoreError> {
        let record = serde_json::to_value(session)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO advisory_sessions (session_id, record, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (session_id)
            DO UPDATE SET record = EXCLUDED.record, updated_at = NOW()
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(record)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionStoreError::Database(format!("Failed to write session: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        let result = sqlx::query("DELETE FROM advisory_sessions WHERE session_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                SessionStoreError::Database(format!("Failed to delete session: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(SessionStoreError::NotFound(id));
        }

        Ok(())
    }
}
