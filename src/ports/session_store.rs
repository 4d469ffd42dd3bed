//! Session store port.
//!
//! Durable get/put of the Session aggregate keyed by session id. The
//! application layer serializes turns per session on top of this port;
//! implementations only need atomic whole-record writes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session record could not be serialized: {0}")]
    Serialization(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Port for Session aggregate persistence.
///
/// Implementations must make `put` all-or-nothing: a failed write
/// leaves the previously committed record intact.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session, or `None` if the id is unknown.
    async fn get(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Writes the full session record, creating or replacing it.
    async fn put(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Deletes a session record (primarily for tests and retention jobs).
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
