//! Embedding client port.
//!
//! The retrieval index stores pre-computed vectors; only the incoming
//! query needs embedding at request time.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the embedding collaborator.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("embedding response malformed: {0}")]
    Malformed(String),
}

/// Port for turning text into an embedding vector.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
