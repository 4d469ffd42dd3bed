//! Knowledge retriever port.
//!
//! Similarity search over a pre-built embedding index of reference
//! knowledge. Retrieval is an enrichment, not a dependency: callers
//! degrade to an empty passage list when the index is unavailable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on passages per query, capping downstream prompt size.
pub const MAX_PASSAGES: usize = 10;

/// One retrieved reference passage. Transient: produced per generation
/// request and discarded after use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text.
    pub text: String,
    /// Similarity score, higher is closer.
    pub score: f32,
    /// Where the passage came from (document id, row, etc.).
    pub source_ref: String,
}

/// Errors from the retrieval collaborator.
///
/// Callers log these and continue with empty passages; a failed
/// retrieval never fails the recommendation step.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("query embedding failed: {0}")]
    Embedding(String),
}

/// Port for similarity search over the reference knowledge index.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Returns up to `k` passages ranked by descending similarity.
    ///
    /// Implementations clamp `k` to [`MAX_PASSAGES`].
    async fn retrieve(&self, query: &str, k: usize)
        -> Result<Vec<RetrievedPassage>, RetrievalError>;
}
