//! Property tests for the pure dialogue engine.

use proptest::prelude::*;

use stack_sherpa::domain::advisory::{next_questions, respond};
use stack_sherpa::domain::checklist::{Catalog, ChecklistQuestion, Pillar};
use stack_sherpa::domain::foundation::{PillarId, QuestionId, SessionId};
use stack_sherpa::domain::session::Session;

fn catalog() -> Catalog {
    let pillars = vec![
        Pillar {
            id: PillarId::new(1),
            name: "Security".to_string(),
            description: "Authentication and data protection".to_string(),
        },
        Pillar {
            id: PillarId::new(2),
            name: "Data".to_string(),
            description: "Storage and analytics".to_string(),
        },
        Pillar {
            id: PillarId::new(3),
            name: "Infrastructure".to_string(),
            description: "Hosting and scaling".to_string(),
        },
    ];
    let questions = (1..=9)
        .map(|i| ChecklistQuestion {
            id: QuestionId::new(i),
            pillar_id: PillarId::new(((i - 1) / 3 + 1) as i32),
            text: format!("Question number {}?", i),
        })
        .collect();
    Catalog::new(pillars, questions).unwrap()
}

/// One user input that can never be read as a dispute or small talk.
#[derive(Debug, Clone)]
enum Input {
    Answer(u32),
    Skip,
}

impl Input {
    fn text(&self) -> String {
        match self {
            Input::Answer(n) => format!("answer {}", n),
            Input::Skip => "skip".to_string(),
        }
    }
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        3 => any::<u32>().prop_map(Input::Answer),
        1 => Just(Input::Skip),
    ]
}

proptest! {
    /// The asked set never shrinks across interview turns.
    #[test]
    fn asked_set_is_monotonic(inputs in proptest::collection::vec(input_strategy(), 1..30)) {
        let catalog = catalog();
        let mut session = Session::new(SessionId::new());

        // Intake first; dispute handling is excluded by construction.
        session = respond(&catalog, &session, "an inventory system").unwrap().session;
        session = respond(&catalog, &session, "Retail").unwrap().session;

        for input in inputs {
            let before: Vec<QuestionId> =
                session.asked_question_ids().iter().copied().collect();
            session = respond(&catalog, &session, &input.text()).unwrap().session;
            for id in &before {
                prop_assert!(session.asked_question_ids().contains(id));
            }
        }
    }

    /// The selector is deterministic, bounded, pillar-homogeneous, and
    /// never re-offers an asked question.
    #[test]
    fn selector_bounds_hold(asked in proptest::collection::btree_set(1u32..=9, 0..=9)) {
        let catalog = catalog();
        let mut session = Session::new(SessionId::new());
        for id in &asked {
            session.mark_asked(QuestionId::new(*id));
        }

        let first = next_questions(&catalog, &session);
        let second = next_questions(&catalog, &session);

        prop_assert_eq!(
            first.iter().map(|q| q.id).collect::<Vec<_>>(),
            second.iter().map(|q| q.id).collect::<Vec<_>>()
        );
        prop_assert!(first.len() <= 2);
        for question in &first {
            prop_assert!(!session.asked_question_ids().contains(&question.id));
        }
        if let Some(head) = first.first() {
            for question in &first {
                prop_assert_eq!(question.pillar_id, head.pillar_id);
            }
        }
        if asked.len() == 9 {
            prop_assert!(first.is_empty());
        }
    }

    /// Every turn appends exactly one user and one assistant entry to
    /// the log, in order.
    #[test]
    fn turn_log_grows_in_pairs(inputs in proptest::collection::vec(input_strategy(), 1..10)) {
        let catalog = catalog();
        let mut session = Session::new(SessionId::new());

        for (i, input) in inputs.iter().enumerate() {
            session = respond(&catalog, &session, &input.text()).unwrap().session;
            prop_assert_eq!(session.turns.len(), (i + 1) * 2);
        }
    }
}
