//! Advisory application service.
//!
//! The imperative shell around the pure dialogue engine: loads the
//! session, runs one transition, performs whatever I/O the engine
//! directed (retrieval + generation), and commits the result as a
//! single write. A failed turn commits nothing.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::advisory::{
    finalize_recommendation, parse_recommendation_reply, respond, EngineDirective, GenerationError,
    IntakeSummary,
};
use crate::domain::checklist::Catalog;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};
use crate::domain::session::{Session, Turn};
use crate::ports::{
    AiProvider, CompletionRequest, KnowledgeRetriever, MessageRole, SessionStore,
    SessionStoreError, MAX_PASSAGES,
};

use super::prompts::PromptSet;

/// Application-level errors surfaced to the HTTP shell.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl AdvisoryError {
    /// Maps to the wire-level error vocabulary.
    pub fn to_domain_error(&self) -> DomainError {
        match self {
            AdvisoryError::SessionNotFound(id) => {
                DomainError::new(ErrorCode::SessionNotFound, self.to_string())
                    .with_detail("session_id", id.to_string())
            }
            AdvisoryError::Validation(e) => e.clone().into(),
            AdvisoryError::Generation(GenerationError::Format(_)) => {
                DomainError::new(ErrorCode::GenerationFormat, self.to_string())
            }
            AdvisoryError::Generation(GenerationError::Upstream(_)) => {
                DomainError::new(ErrorCode::GenerationUpstream, self.to_string())
            }
            AdvisoryError::Store(_) => {
                DomainError::new(ErrorCode::DatabaseError, self.to_string())
            }
        }
    }
}

/// Orchestrates advisory turns over the injected collaborators.
pub struct AdvisoryService {
    catalog: Arc<Catalog>,
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AiProvider>,
    retriever: Arc<dyn KnowledgeRetriever>,
    prompts: PromptSet,
    /// Passages requested per generation, capped at `MAX_PASSAGES`.
    top_k: usize,
    /// Per-session turn locks. Turns on the same session queue; distinct
    /// sessions never contend. Entries are dropped once the last queued
    /// turn releases them.
    turn_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl AdvisoryService {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn AiProvider>,
        retriever: Arc<dyn KnowledgeRetriever>,
        prompts: PromptSet,
        top_k: usize,
    ) -> Self {
        Self {
            catalog,
            store,
            provider,
            retriever,
            prompts,
            top_k: top_k.min(MAX_PASSAGES),
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Runs one conversational turn and returns the reply text.
    ///
    /// An unknown session id starts a fresh session. The turn lock is
    /// held across the whole pipeline, including generation, so
    /// concurrent turns on one session serialize.
    ///
    /// # Errors
    ///
    /// - `Validation` if the message is blank; nothing is committed
    /// - `Generation` if the recommendation step fails; nothing is committed
    /// - `Store` on persistence failures
    #[instrument(skip(self, text), fields(session_id = %session_id))]
    pub async fn handle_turn(
        &self,
        session_id: SessionId,
        text: &str,
    ) -> Result<String, AdvisoryError> {
        let lock = self.turn_lock(session_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_turn(session_id, text).await
        };
        self.release_turn_lock(session_id, &lock).await;
        result
    }

    async fn run_turn(&self, session_id: SessionId, text: &str) -> Result<String, AdvisoryError> {
        let session = self
            .store
            .get(session_id)
            .await?
            .unwrap_or_else(|| Session::new(session_id));

        let reply = respond(&self.catalog, &session, text)?;

        match reply.directive {
            EngineDirective::None => {
                self.store.put(&reply.session).await?;
                Ok(reply.message)
            }
            EngineDirective::GenerateRecommendation(summary) => {
                // Generation first, commit after: if the model call or
                // parse fails the pre-transition record stays intact.
                let recommendation = self.generate_recommendation(&summary).await?;
                let (session, message) = finalize_recommendation(&reply.session, recommendation);
                self.store.put(&session).await?;
                info!(session_id = %session_id, "recommendation generated");
                Ok(message)
            }
        }
    }

    /// Clears checklist progress and returns the session to the opening
    /// phase. The turn log is preserved.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the id is unknown
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn reset_session(&self, session_id: SessionId) -> Result<(), AdvisoryError> {
        let lock = self.turn_lock(session_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_reset(session_id).await
        };
        self.release_turn_lock(session_id, &lock).await;
        result
    }

    async fn run_reset(&self, session_id: SessionId) -> Result<(), AdvisoryError> {
        let mut session = self
            .store
            .get(session_id)
            .await?
            .ok_or(AdvisoryError::SessionNotFound(session_id))?;

        session.reset(false);
        self.store.put(&session).await?;
        info!(session_id = %session_id, "session reset");
        Ok(())
    }

    /// Returns the full turn log of a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the id is unknown
    pub async fn conversation(&self, session_id: SessionId) -> Result<Vec<Turn>, AdvisoryError> {
        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or(AdvisoryError::SessionNotFound(session_id))?;
        Ok(session.turns)
    }

    async fn turn_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        locks.entry(session_id).or_default().clone()
    }

    /// Evicts the lock entry once no other turn is queued on the
    /// session, so the map does not grow with every session ever seen.
    async fn release_turn_lock(&self, session_id: SessionId, lock: &Arc<Mutex<()>>) {
        let mut locks = self.turn_locks.lock().await;
        // Two strong counts: the map entry and our handle. Anything
        // higher means another turn holds a clone and will release it.
        if Arc::strong_count(lock) == 2 {
            locks.remove(&session_id);
        }
    }

    async fn generate_recommendation(
        &self,
        summary: &IntakeSummary,
    ) -> Result<crate::domain::advisory::Recommendation, AdvisoryError> {
        let digest = summary.digest();

        // Retrieval is an enrichment: a failed lookup degrades to an
        // ungrounded prompt instead of failing the turn.
        let passages = match self.retriever.retrieve(&digest, self.top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(error = %e, "knowledge retrieval failed, continuing without passages");
                Vec::new()
            }
        };

        let passage_text = passages
            .iter()
            .map(|p| format!("[{}] {}", p.source_ref, p.text))
            .collect::<Vec<_>>()
            .join("\n");

        let request = CompletionRequest::new()
            .with_system_prompt(self.prompts.recommender_system.clone())
            .with_message(
                MessageRole::User,
                self.prompts.render_recommender(&digest, &passage_text),
            )
            .with_temperature(0.2)
            .with_max_tokens(1500);

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let pillar_order: Vec<String> = self
            .catalog
            .pillar_order()
            .iter()
            .map(|p| p.name.clone())
            .collect();

        Ok(parse_recommendation_reply(&response.content, &pillar_order)?)
    }
}
