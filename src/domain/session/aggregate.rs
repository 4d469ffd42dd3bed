//! Session aggregate root.
//!
//! A `Session` is the durable record of one user's advisory
//! conversation: checklist progress, the turn log, and the phase of the
//! interview. It is mutated only through the phase machine's transition
//! functions; no other component writes to it directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::advisory::{AdvisoryPhase, Recommendation};
use crate::domain::foundation::{QuestionId, SessionId};

use super::turn::Turn;

/// One user's ongoing advisory conversation.
///
/// # Invariants
///
/// - `asked_question_ids` is a superset of the keys of `answers`
///   (a question may be asked and then skipped)
/// - `asked_question_ids` never shrinks within an advisory cycle
///   except through dispute handling or reset
/// - `answers` preserves insertion order (= answer order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique token identifying this session.
    pub session_id: SessionId,

    /// Current phase of the advisory flow.
    pub phase: AdvisoryPhase,

    /// What the user wants to build; captured during intake.
    pub initiative: Option<String>,

    /// The problem domain (e.g. "Education"); captured during intake.
    pub domain: Option<String>,

    /// Answers captured so far, in answer order.
    answers: Vec<(QuestionId, String)>,

    /// Questions already presented, answered or not.
    asked_question_ids: BTreeSet<QuestionId>,

    /// Questions presented in the latest engine turn, awaiting a reply.
    /// Always a subset of `asked_question_ids`. A skip clears this list
    /// without recording answers, leaving the questions asked-but-unanswered.
    pending_question_ids: Vec<QuestionId>,

    /// Full conversation log. The engine is the sole writer.
    pub turns: Vec<Turn>,

    /// Whether the user confirmed the intake summary.
    pub summary_confirmed: bool,

    /// Structured recommendation, present once generated.
    pub recommendation: Option<Recommendation>,
}

impl Session {
    /// Creates a fresh session for the given id, in the initial phase.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            phase: AdvisoryPhase::IntakeInitiative,
            initiative: None,
            domain: None,
            answers: Vec::new(),
            asked_question_ids: BTreeSet::new(),
            pending_question_ids: Vec::new(),
            turns: Vec::new(),
            summary_confirmed: false,
            recommendation: None,
        }
    }

    /// Answers in insertion (answer) order.
    pub fn answers(&self) -> &[(QuestionId, String)] {
        &self.answers
    }

    /// The answer recorded for a question, if any.
    pub fn answer_for(&self, id: QuestionId) -> Option<&str> {
        self.answers
            .iter()
            .find(|(qid, _)| *qid == id)
            .map(|(_, text)| text.as_str())
    }

    /// Questions already presented to the user.
    pub fn asked_question_ids(&self) -> &BTreeSet<QuestionId> {
        &self.asked_question_ids
    }

    /// True once both intake fields have been captured.
    pub fn intake_complete(&self) -> bool {
        self.initiative.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self.domain.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Questions presented in the latest engine turn, awaiting a reply.
    pub fn pending_question_ids(&self) -> &[QuestionId] {
        &self.pending_question_ids
    }

    /// Marks a question as presented.
    pub fn mark_asked(&mut self, id: QuestionId) {
        self.asked_question_ids.insert(id);
    }

    /// Replaces the pending list with newly presented questions, marking
    /// each as asked.
    pub fn set_pending(&mut self, ids: Vec<QuestionId>) {
        for id in &ids {
            self.asked_question_ids.insert(*id);
        }
        self.pending_question_ids = ids;
    }

    /// Clears the pending list without recording answers (a skip).
    pub fn clear_pending(&mut self) {
        self.pending_question_ids.clear();
    }

    /// Records an answer for an already-asked question.
    ///
    /// A re-answer (after dispute handling) replaces the previous text
    /// in place, preserving the original answer order.
    pub fn record_answer(&mut self, id: QuestionId, text: impl Into<String>) {
        self.asked_question_ids.insert(id);
        let text = text.into();
        match self.answers.iter_mut().find(|(qid, _)| *qid == id) {
            Some((_, existing)) => *existing = text,
            None => self.answers.push((id, text)),
        }
    }

    /// Reopens questions for a targeted re-ask after the user disputes
    /// the summary: removes them from both the asked set and answers.
    pub fn reopen_questions(&mut self, ids: &[QuestionId]) {
        for id in ids {
            self.asked_question_ids.remove(id);
        }
        self.answers.retain(|(qid, _)| !ids.contains(qid));
        self.pending_question_ids.retain(|qid| !ids.contains(qid));
    }

    /// Appends a turn to the conversation log.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Clears checklist progress and returns the session to the initial
    /// phase. `session_id` is preserved; the turn log is kept unless the
    /// caller explicitly purges it.
    pub fn reset(&mut self, purge_turns: bool) {
        self.phase = AdvisoryPhase::IntakeInitiative;
        self.initiative = None;
        self.domain = None;
        self.answers.clear();
        self.asked_question_ids.clear();
        self.pending_question_ids.clear();
        self.summary_confirmed = false;
        self.recommendation = None;
        if purge_turns {
            self.turns.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: u32) -> QuestionId {
        QuestionId::new(id)
    }

    #[test]
    fn new_session_starts_in_intake_initiative() {
        let session = Session::new(SessionId::new());
        assert_eq!(session.phase, AdvisoryPhase::IntakeInitiative);
        assert!(session.answers().is_empty());
        assert!(session.asked_question_ids().is_empty());
        assert!(!session.summary_confirmed);
        assert!(session.recommendation.is_none());
    }

    #[test]
    fn intake_complete_requires_both_fields_non_empty() {
        let mut session = Session::new(SessionId::new());
        assert!(!session.intake_complete());

        session.initiative = Some("LMS platform".to_string());
        assert!(!session.intake_complete());

        session.domain = Some("   ".to_string());
        assert!(!session.intake_complete());

        session.domain = Some("Education".to_string());
        assert!(session.intake_complete());
    }

    #[test]
    fn record_answer_implies_asked() {
        let mut session = Session::new(SessionId::new());
        session.record_answer(q(3), "OAuth and SSO");
        assert!(session.asked_question_ids().contains(&q(3)));
        assert_eq!(session.answer_for(q(3)), Some("OAuth and SSO"));
    }

    #[test]
    fn asked_is_superset_of_answered() {
        let mut session = Session::new(SessionId::new());
        session.mark_asked(q(1));
        session.mark_asked(q(2));
        session.record_answer(q(2), "Cloud");

        assert_eq!(session.asked_question_ids().len(), 2);
        assert!(session.answer_for(q(1)).is_none());
    }

    #[test]
    fn re_answer_replaces_in_place_keeping_order() {
        let mut session = Session::new(SessionId::new());
        session.record_answer(q(1), "first");
        session.record_answer(q(2), "second");
        session.record_answer(q(1), "revised");

        let order: Vec<u32> = session.answers().iter().map(|(id, _)| id.value()).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(session.answer_for(q(1)), Some("revised"));
    }

    #[test]
    fn reopen_questions_removes_asked_answers_and_pending() {
        let mut session = Session::new(SessionId::new());
        session.record_answer(q(1), "a");
        session.record_answer(q(2), "b");
        session.set_pending(vec![q(1)]);
        session.reopen_questions(&[q(1)]);

        assert!(!session.asked_question_ids().contains(&q(1)));
        assert!(session.asked_question_ids().contains(&q(2)));
        assert!(session.answer_for(q(1)).is_none());
        assert!(session.pending_question_ids().is_empty());
    }

    #[test]
    fn set_pending_marks_questions_asked() {
        let mut session = Session::new(SessionId::new());
        session.set_pending(vec![q(4), q(5)]);

        assert_eq!(session.pending_question_ids(), &[q(4), q(5)]);
        assert!(session.asked_question_ids().contains(&q(4)));
        assert!(session.asked_question_ids().contains(&q(5)));
    }

    #[test]
    fn clear_pending_keeps_questions_asked() {
        let mut session = Session::new(SessionId::new());
        session.set_pending(vec![q(4)]);
        session.clear_pending();

        assert!(session.pending_question_ids().is_empty());
        assert!(session.asked_question_ids().contains(&q(4)));
        assert!(session.answer_for(q(4)).is_none());
    }

    #[test]
    fn reset_preserves_id_and_turns_by_default() {
        let mut session = Session::new(SessionId::new());
        let id = session.session_id;
        session.initiative = Some("LMS".to_string());
        session.domain = Some("Education".to_string());
        session.record_answer(q(1), "a");
        session.summary_confirmed = true;
        session.push_turn(Turn::user("hello").unwrap());
        session.phase = AdvisoryPhase::RecommendationReady;

        session.reset(false);

        assert_eq!(session.session_id, id);
        assert_eq!(session.phase, AdvisoryPhase::IntakeInitiative);
        assert!(session.initiative.is_none());
        assert!(session.answers().is_empty());
        assert!(session.asked_question_ids().is_empty());
        assert!(!session.summary_confirmed);
        assert!(session.recommendation.is_none());
        assert_eq!(session.turns.len(), 1);
    }

    #[test]
    fn reset_can_purge_turns() {
        let mut session = Session::new(SessionId::new());
        session.push_turn(Turn::user("hello").unwrap());
        session.reset(true);
        assert!(session.turns.is_empty());
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = Session::new(SessionId::new());
        session.initiative = Some("LMS".to_string());
        session.record_answer(q(1), "a");
        session.push_turn(Turn::user("hi").unwrap());

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
