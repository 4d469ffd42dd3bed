//! Question selector.
//!
//! Picks the next one or two unasked questions, respecting canonical
//! pillar ordering. The cap of two keeps turns conversational rather
//! than a form dump.

use crate::domain::checklist::{Catalog, ChecklistQuestion};
use crate::domain::session::Session;

/// Maximum questions offered per turn.
const MAX_QUESTIONS_PER_TURN: usize = 2;

/// Returns up to two unasked questions from the first pillar (in
/// canonical order) that still has any, in source order.
///
/// Returns an empty vector once every catalog question has been asked,
/// which is the signal that the checklist phase is complete. Never
/// returns a question already present in the session's asked set.
pub fn next_questions<'a>(catalog: &'a Catalog, session: &Session) -> Vec<&'a ChecklistQuestion> {
    let asked = session.asked_question_ids();

    for pillar in catalog.pillar_order() {
        let unasked: Vec<&ChecklistQuestion> = catalog
            .questions_for_pillar(pillar.id)
            .into_iter()
            .filter(|q| !asked.contains(&q.id))
            .take(MAX_QUESTIONS_PER_TURN)
            .collect();

        if !unasked.is_empty() {
            return unasked;
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checklist::catalog::fixtures::sample_catalog;
    use crate::domain::foundation::{QuestionId, SessionId};

    fn q(id: u32) -> QuestionId {
        QuestionId::new(id)
    }

    #[test]
    fn fresh_session_gets_first_pillar_first_two() {
        let catalog = sample_catalog();
        let session = Session::new(SessionId::new());

        let next = next_questions(&catalog, &session);
        let ids: Vec<u32> = next.iter().map(|x| x.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn offers_single_remaining_question_of_a_pillar() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        session.mark_asked(q(1));
        session.mark_asked(q(2));

        let next = next_questions(&catalog, &session);
        let ids: Vec<u32> = next.iter().map(|x| x.id.value()).collect();
        assert_eq!(ids, vec![3], "stays within the pillar until exhausted");
    }

    #[test]
    fn moves_to_next_pillar_when_first_is_exhausted() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        for id in [1, 2, 3] {
            session.mark_asked(q(id));
        }

        let next = next_questions(&catalog, &session);
        let ids: Vec<u32> = next.iter().map(|x| x.id.value()).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn never_returns_already_asked_questions() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        session.mark_asked(q(1));
        session.mark_asked(q(4));

        let next = next_questions(&catalog, &session);
        for question in &next {
            assert!(!session.asked_question_ids().contains(&question.id));
        }
    }

    #[test]
    fn empty_once_everything_is_asked() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        for question in catalog.all_questions() {
            session.mark_asked(question.id);
        }

        assert!(next_questions(&catalog, &session).is_empty());
    }

    #[test]
    fn reopened_questions_are_offered_again() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        for question in catalog.all_questions() {
            session.record_answer(question.id, "answered");
        }
        session.reopen_questions(&[q(1), q(2), q(3)]);

        let next = next_questions(&catalog, &session);
        let ids: Vec<u32> = next.iter().map(|x| x.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
