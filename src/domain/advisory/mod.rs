//! Advisory dialogue engine: phase machine, question selection,
//! summarization and recommendation parsing.
//!
//! Everything in this module is deterministic and side-effect free.
//! The application layer performs the retrieval and generation I/O the
//! engine requests via [`EngineDirective`].

mod engine;
mod phase;
mod recommendation;
mod selector;
mod summarizer;

pub use engine::{finalize_recommendation, respond, EngineDirective, EngineReply};
pub use phase::AdvisoryPhase;
pub use recommendation::{
    parse_recommendation_reply, GenerationError, Recommendation, RecommendationEntry,
};
pub use selector::next_questions;
pub use summarizer::{summarize, IntakeSummary, PillarSummary};
