//! In-memory session store.
//!
//! Backing store for tests and single-process deployments. Each `put`
//! replaces the whole record under a lock, so partial writes cannot be
//! observed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn put(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(SessionStoreError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advisory::AdvisoryPhase;

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = InMemorySessionStore::new();
        assert!(store.get(SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(SessionId::new());
        session.initiative = Some("LMS platform".to_string());

        store.put(&session).await.unwrap();
        let loaded = store.get(session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn put_replaces_existing_record() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(SessionId::new());
        store.put(&session).await.unwrap();

        session.phase = AdvisoryPhase::IntakeChecklist;
        store.put(&session).await.unwrap();

        let loaded = store.get(session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.phase, AdvisoryPhase::IntakeChecklist);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = InMemorySessionStore::new();
        let session = Session::new(SessionId::new());
        store.put(&session).await.unwrap();

        store.delete(session.session_id).await.unwrap();
        assert!(store.get(session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let store = InMemorySessionStore::new();
        let result = store.delete(SessionId::new()).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
    }
}
