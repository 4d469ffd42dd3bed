//! File-backed embedding index.
//!
//! Loads a pre-built JSON artifact of reference passages with their
//! embedding vectors, embeds incoming queries through an
//! [`EmbeddingClient`], and ranks passages by cosine similarity. The
//! artifact is produced offline by an indexing job; this adapter only
//! reads it.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ports::{
    EmbeddingClient, KnowledgeRetriever, RetrievalError, RetrievedPassage, MAX_PASSAGES,
};

/// Errors loading the index artifact.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("index file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("index entry {position} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("index file contains no entries")]
    Empty,
}

/// One indexed passage as stored in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    text: String,
    source_ref: String,
    vector: Vec<f32>,
}

/// On-disk artifact shape.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    entries: Vec<IndexEntry>,
}

/// In-memory similarity index over reference passages.
pub struct EmbeddedIndex {
    entries: Vec<IndexEntry>,
    embedder: Arc<dyn EmbeddingClient>,
}

impl EmbeddedIndex {
    /// Loads the index artifact from disk.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `Malformed` if it is not the expected JSON shape
    /// - `Empty` if it holds no entries
    /// - `DimensionMismatch` if entry vectors disagree in length
    pub fn load(path: &Path, embedder: Arc<dyn EmbeddingClient>) -> Result<Self, IndexError> {
        let raw = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: IndexFile = serde_json::from_str(&raw)?;
        Self::from_entries(file.entries, embedder)
    }

    fn from_entries(
        entries: Vec<IndexEntry>,
        embedder: Arc<dyn EmbeddingClient>,
    ) -> Result<Self, IndexError> {
        if entries.is_empty() {
            return Err(IndexError::Empty);
        }
        let expected = entries[0].vector.len();
        for (position, entry) in entries.iter().enumerate() {
            if entry.vector.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    position,
                    expected,
                    found: entry.vector.len(),
                });
            }
        }
        debug!(entries = entries.len(), dimension = expected, "knowledge index loaded");
        Ok(Self { entries, embedder })
    }

    fn rank(&self, query_vector: &[f32], k: usize) -> Vec<RetrievedPassage> {
        let mut scored: Vec<RetrievedPassage> = self
            .entries
            .iter()
            .map(|entry| RetrievedPassage {
                text: entry.text.clone(),
                score: cosine_similarity(query_vector, &entry.vector),
                source_ref: entry.source_ref.clone(),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

#[async_trait]
impl KnowledgeRetriever for EmbeddedIndex {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let k = k.min(MAX_PASSAGES);
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        if query_vector.len() != self.entries[0].vector.len() {
            return Err(RetrievalError::Embedding(format!(
                "query dimension {} does not match index dimension {}",
                query_vector.len(),
                self.entries[0].vector.len()
            )));
        }

        Ok(self.rank(&query_vector, k))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::EmbeddingError;
    use std::sync::Mutex;

    struct FixedEmbedder {
        vector: Mutex<Result<Vec<f32>, String>>,
    }

    impl FixedEmbedder {
        fn returning(vector: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                vector: Mutex::new(Ok(vector)),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                vector: Mutex::new(Err(message.to_string())),
            })
        }
    }

    #[async_trait]
    impl EmbeddingClient for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.vector
                .lock()
                .unwrap()
                .clone()
                .map_err(EmbeddingError::Request)
        }
    }

    fn entry(text: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            text: text.to_string(),
            source_ref: format!("kb/{text}"),
            vector,
        }
    }

    fn sample_index(embedder: Arc<dyn EmbeddingClient>) -> EmbeddedIndex {
        EmbeddedIndex::from_entries(
            vec![
                entry("postgres", vec![1.0, 0.0, 0.0]),
                entry("kafka", vec![0.0, 1.0, 0.0]),
                entry("redis", vec![0.7, 0.7, 0.0]),
            ],
            embedder,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ranks_by_cosine_similarity_descending() {
        let index = sample_index(FixedEmbedder::returning(vec![1.0, 0.0, 0.0]));
        let passages = index.retrieve("transactional storage", 3).await.unwrap();

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["postgres", "redis", "kafka"]);
        assert!(passages[0].score > passages[1].score);
    }

    #[tokio::test]
    async fn clamps_k_to_maximum() {
        let index = sample_index(FixedEmbedder::returning(vec![1.0, 0.0, 0.0]));
        let passages = index.retrieve("anything", 500).await.unwrap();
        assert!(passages.len() <= MAX_PASSAGES);
        assert_eq!(passages.len(), 3);
    }

    #[tokio::test]
    async fn k_zero_skips_embedding() {
        let index = sample_index(FixedEmbedder::failing("should not be called"));
        let passages = index.retrieve("anything", 0).await.unwrap();
        assert!(passages.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_maps_to_retrieval_error() {
        let index = sample_index(FixedEmbedder::failing("quota exceeded"));
        let result = index.retrieve("anything", 3).await;
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let index = sample_index(FixedEmbedder::returning(vec![1.0, 0.0]));
        let result = index.retrieve("anything", 3).await;
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    }

    #[test]
    fn empty_artifact_is_rejected() {
        let result =
            EmbeddedIndex::from_entries(Vec::new(), FixedEmbedder::returning(vec![1.0]));
        assert!(matches!(result, Err(IndexError::Empty)));
    }

    #[test]
    fn mixed_dimensions_are_rejected_at_load() {
        let result = EmbeddedIndex::from_entries(
            vec![entry("a", vec![1.0, 0.0]), entry("b", vec![1.0])],
            FixedEmbedder::returning(vec![1.0, 0.0]),
        );
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
