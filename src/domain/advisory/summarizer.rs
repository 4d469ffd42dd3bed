//! Intake summarizer.
//!
//! A pure projection of session data into a confirmable summary. No
//! model call is involved, which keeps confirmation cheap and reliable:
//! the same session always produces the same summary.

use serde::{Deserialize, Serialize};

use crate::domain::checklist::Catalog;
use crate::domain::foundation::PillarId;
use crate::domain::session::Session;

/// One pillar's answered questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarSummary {
    pub pillar_id: PillarId,
    pub pillar_name: String,
    /// (question text, answer text) pairs in catalog order.
    pub answers: Vec<(String, String)>,
}

/// Structured restatement of everything captured during intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSummary {
    pub initiative: String,
    pub domain: String,
    /// Pillars in canonical order; pillars with zero answers are omitted.
    pub pillars: Vec<PillarSummary>,
}

impl IntakeSummary {
    /// Renders the summary as display text for the confirmation turn.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Here is a summary of what you told me.\n\n");
        out.push_str(&format!("Initiative: {}\n", self.initiative));
        out.push_str(&format!("Domain: {}\n", self.domain));
        for pillar in &self.pillars {
            out.push_str(&format!("\n{}:\n", pillar.pillar_name));
            for (question, answer) in &pillar.answers {
                out.push_str(&format!("  - {}\n    {}\n", question, answer));
            }
        }
        out.push_str("\nIs this correct? Reply yes to confirm, or tell me what to fix.");
        out
    }

    /// Compact digest of the answers, used to build the retrieval query
    /// and the generation prompt.
    pub fn digest(&self) -> String {
        let mut parts = vec![
            format!("Initiative: {}", self.initiative),
            format!("Domain: {}", self.domain),
        ];
        for pillar in &self.pillars {
            for (question, answer) in &pillar.answers {
                parts.push(format!("{} [{}]: {}", pillar.pillar_name, question, answer));
            }
        }
        parts.join("\n")
    }
}

/// Projects the session into a structured summary.
///
/// Deterministic: calling it twice on an unchanged session yields
/// identical output. Unanswered (skipped) questions do not appear;
/// pillars with no answered questions are omitted entirely.
pub fn summarize(catalog: &Catalog, session: &Session) -> IntakeSummary {
    let pillars = catalog
        .pillar_order()
        .iter()
        .filter_map(|pillar| {
            let answers: Vec<(String, String)> = catalog
                .questions_for_pillar(pillar.id)
                .into_iter()
                .filter_map(|question| {
                    session
                        .answer_for(question.id)
                        .map(|answer| (question.text.clone(), answer.to_string()))
                })
                .collect();

            if answers.is_empty() {
                None
            } else {
                Some(PillarSummary {
                    pillar_id: pillar.id,
                    pillar_name: pillar.name.clone(),
                    answers,
                })
            }
        })
        .collect();

    IntakeSummary {
        initiative: session.initiative.clone().unwrap_or_default(),
        domain: session.domain.clone().unwrap_or_default(),
        pillars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checklist::catalog::fixtures::sample_catalog;
    use crate::domain::foundation::{QuestionId, SessionId};

    fn populated_session() -> Session {
        let mut session = Session::new(SessionId::new());
        session.initiative = Some("LMS platform".to_string());
        session.domain = Some("Education".to_string());
        session.record_answer(QuestionId::new(1), "Email plus SSO");
        session.record_answer(QuestionId::new(4), "Cloud");
        session.mark_asked(QuestionId::new(2)); // asked, skipped
        session
    }

    #[test]
    fn includes_only_pillars_with_answers() {
        let catalog = sample_catalog();
        let mut session = Session::new(SessionId::new());
        session.initiative = Some("LMS".to_string());
        session.domain = Some("Education".to_string());
        session.record_answer(QuestionId::new(1), "Email plus SSO");

        let summary = summarize(&catalog, &session);
        assert_eq!(summary.pillars.len(), 1);
        assert_eq!(summary.pillars[0].pillar_name, "Security");
    }

    #[test]
    fn skipped_questions_are_absent() {
        let catalog = sample_catalog();
        let summary = summarize(&catalog, &populated_session());

        let security = &summary.pillars[0];
        assert_eq!(security.answers.len(), 1, "skipped question is omitted");
    }

    #[test]
    fn pillars_follow_canonical_order() {
        let catalog = sample_catalog();
        let summary = summarize(&catalog, &populated_session());
        let names: Vec<&str> = summary.pillars.iter().map(|p| p.pillar_name.as_str()).collect();
        assert_eq!(names, vec!["Security", "Infrastructure"]);
    }

    #[test]
    fn summarize_is_deterministic() {
        let catalog = sample_catalog();
        let session = populated_session();
        assert_eq!(summarize(&catalog, &session), summarize(&catalog, &session));
    }

    #[test]
    fn render_mentions_initiative_domain_and_answers() {
        let catalog = sample_catalog();
        let text = summarize(&catalog, &populated_session()).render();
        assert!(text.contains("Initiative: LMS platform"));
        assert!(text.contains("Domain: Education"));
        assert!(text.contains("Security"));
        assert!(text.contains("Email plus SSO"));
        assert!(text.contains("Is this correct?"));
    }

    #[test]
    fn digest_flattens_answers_with_pillar_labels() {
        let catalog = sample_catalog();
        let digest = summarize(&catalog, &populated_session()).digest();
        assert!(digest.contains("Security ["));
        assert!(digest.contains("Infrastructure ["));
        assert!(digest.contains("Cloud"));
    }
}
