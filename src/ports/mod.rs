//! Ports: interfaces to external collaborators.
//!
//! Adapters implement these traits; the application layer depends only
//! on the traits, which keeps the engine testable without network or
//! database access.

mod ai_provider;
mod embedding_client;
mod knowledge_retriever;
mod session_store;

pub use ai_provider::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, Message, MessageRole, TokenUsage,
};
pub use embedding_client::{EmbeddingClient, EmbeddingError};
pub use knowledge_retriever::{KnowledgeRetriever, RetrievalError, RetrievedPassage, MAX_PASSAGES};
pub use session_store::{SessionStore, SessionStoreError};
