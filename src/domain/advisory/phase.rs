//! Advisory phase state machine.
//!
//! Governs the four phases of an advisory cycle and their legal
//! transitions. The phase is part of the persisted session record, so
//! variants serialize to stable snake_case strings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The current phase of an advisory conversation.
///
/// Phases advance strictly forward within a cycle:
/// - `IntakeInitiative`: capturing what the user wants to build and in
///   which domain
/// - `IntakeChecklist`: walking the pillar checklist question by question
/// - `AwaitingSummaryConfirmation`: the intake summary is on the table,
///   waiting for the user's verdict
/// - `RecommendationReady`: a recommendation has been produced; terminal
///   for the cycle, only an explicit reset starts a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryPhase {
    /// Capturing initiative and domain.
    #[default]
    IntakeInitiative,

    /// Walking the checklist pillar by pillar.
    IntakeChecklist,

    /// Summary presented, awaiting an affirmative confirmation.
    AwaitingSummaryConfirmation,

    /// Recommendation produced; read-only until reset.
    RecommendationReady,
}

impl StateMachine for AdvisoryPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AdvisoryPhase::*;
        matches!(
            (self, target),
            // Both intake fields captured
            (IntakeInitiative, IntakeChecklist) |
            // Every catalog question has been asked
            (IntakeChecklist, AwaitingSummaryConfirmation) |
            // Affirmative confirmation and successful generation
            (AwaitingSummaryConfirmation, RecommendationReady) |
            // Explicit reset starts a new cycle
            (RecommendationReady, IntakeInitiative)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AdvisoryPhase::*;
        match self {
            IntakeInitiative => vec![IntakeChecklist],
            IntakeChecklist => vec![AwaitingSummaryConfirmation],
            AwaitingSummaryConfirmation => vec![RecommendationReady],
            RecommendationReady => vec![IntakeInitiative],
        }
    }
}
