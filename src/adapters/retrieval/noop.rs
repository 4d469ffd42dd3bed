//! Retriever that always returns no passages.
//!
//! Used when no knowledge index is configured; generation proceeds
//! without grounding context.

use async_trait::async_trait;

use crate::ports::{KnowledgeRetriever, RetrievalError, RetrievedPassage};

/// A retriever with no index behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetriever;

#[async_trait]
impl KnowledgeRetriever for NoopRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        Ok(Vec::new())
    }
}
