//! Turn entities for the conversation log.
//!
//! Turns are immutable records of user/assistant exchanges. Incoming
//! payloads are validated here, before they can reach the phase machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Role of a turn author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// User input.
    User,
    /// Engine reply.
    Assistant,
}

/// An immutable turn within a session's conversation log.
///
/// # Invariants
///
/// - `content` is non-empty (validated at construction)
/// - `timestamp` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn.
    pub role: TurnRole,
    /// The turn content.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: Timestamp,
}

impl Turn {
    /// Creates a new turn with the given role and content.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is blank
    pub fn new(role: TurnRole, content: impl Into<String>) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            role,
            content,
            timestamp: Timestamp::now(),
        })
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(TurnRole::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(TurnRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_user_and_assistant_turns() {
        let user = Turn::user("We are building an LMS").unwrap();
        let assistant = Turn::assistant("Tell me more").unwrap();
        assert_eq!(user.role, TurnRole::User);
        assert_eq!(assistant.role, TurnRole::Assistant);
    }

    #[test]
    fn rejects_empty_content() {
        assert!(Turn::user("").is_err());
        assert!(Turn::user("   \n\t").is_err());
    }

    #[test]
    fn role_serializes_to_snake_case() {
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn turn_round_trips_through_json() {
        let turn = Turn::user("hello").unwrap();
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(turn, back);
    }
}
