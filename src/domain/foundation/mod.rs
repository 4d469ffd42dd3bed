//! Foundation types shared across the domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PillarId, QuestionId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
