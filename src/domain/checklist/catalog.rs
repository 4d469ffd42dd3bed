//! Immutable catalog of pillars and checklist questions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{PillarId, QuestionId};

/// A thematic grouping of checklist questions (e.g. Security, Infrastructure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    /// Stable identifier declared by the source asset.
    pub id: PillarId,
    /// Display name, e.g. "Security".
    pub name: String,
    /// Short description of what the pillar covers.
    pub description: String,
}

/// One interview item within a pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistQuestion {
    /// Stable identifier derived from source row order.
    pub id: QuestionId,
    /// The pillar this question belongs to.
    pub pillar_id: PillarId,
    /// The question text presented to the user.
    pub text: String,
}

/// Errors raised while building the catalog. All are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read checklist source: {0}")]
    Source(String),

    #[error("question {question_id} references unknown pillar {pillar_id}")]
    UnknownPillar {
        question_id: QuestionId,
        pillar_id: PillarId,
    },

    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("duplicate pillar id {0}")]
    DuplicatePillar(PillarId),

    #[error("question {0} has empty text")]
    EmptyQuestion(QuestionId),

    #[error("catalog contains no questions")]
    Empty,
}

/// Immutable, process-wide catalog of pillars and questions.
///
/// Pillar ordering and within-pillar question ordering follow the
/// source declaration and form the canonical traversal order.
#[derive(Debug, Clone)]
pub struct Catalog {
    pillars: Vec<Pillar>,
    questions: Vec<ChecklistQuestion>,
    by_question_id: HashMap<QuestionId, usize>,
    by_pillar_id: HashMap<PillarId, Vec<usize>>,
}

impl Catalog {
    /// Builds a catalog from pre-parsed pillars and questions.
    ///
    /// Fails fast on a question without a resolvable pillar, a
    /// colliding question id, or empty question text.
    pub fn new(
        pillars: Vec<Pillar>,
        questions: Vec<ChecklistQuestion>,
    ) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut pillar_ids = HashMap::new();
        for pillar in &pillars {
            if pillar_ids.insert(pillar.id, ()).is_some() {
                return Err(CatalogError::DuplicatePillar(pillar.id));
            }
        }

        let mut by_question_id = HashMap::with_capacity(questions.len());
        let mut by_pillar_id: HashMap<PillarId, Vec<usize>> = HashMap::new();

        for (index, question) in questions.iter().enumerate() {
            if question.text.trim().is_empty() {
                return Err(CatalogError::EmptyQuestion(question.id));
            }
            if !pillar_ids.contains_key(&question.pillar_id) {
                return Err(CatalogError::UnknownPillar {
                    question_id: question.id,
                    pillar_id: question.pillar_id,
                });
            }
            if by_question_id.insert(question.id, index).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id));
            }
            by_pillar_id.entry(question.pillar_id).or_default().push(index);
        }

        Ok(Self {
            pillars,
            questions,
            by_question_id,
            by_pillar_id,
        })
    }

    /// All questions in source order.
    pub fn all_questions(&self) -> &[ChecklistQuestion] {
        &self.questions
    }

    /// Questions belonging to a pillar, in source order.
    pub fn questions_for_pillar(&self, pillar_id: PillarId) -> Vec<&ChecklistQuestion> {
        self.by_pillar_id
            .get(&pillar_id)
            .map(|indices| indices.iter().map(|&i| &self.questions[i]).collect())
            .unwrap_or_default()
    }

    /// Pillars in canonical (source-declared) traversal order.
    pub fn pillar_order(&self) -> &[Pillar] {
        &self.pillars
    }

    /// Looks up a pillar by id.
    pub fn pillar(&self, id: PillarId) -> Option<&Pillar> {
        self.pillars.iter().find(|p| p.id == id)
    }

    /// Looks up a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&ChecklistQuestion> {
        self.by_question_id.get(&id).map(|&i| &self.questions[i])
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True when the catalog holds no questions (never constructed this way).
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small two-pillar catalog used across domain tests.
    pub fn sample_catalog() -> Catalog {
        let pillars = vec![
            Pillar {
                id: PillarId::new(1),
                name: "Security".to_string(),
                description: "Authentication, authorization and data protection".to_string(),
            },
            Pillar {
                id: PillarId::new(2),
                name: "Infrastructure".to_string(),
                description: "Hosting, scaling and operations".to_string(),
            },
        ];
        let questions = vec![
            ChecklistQuestion {
                id: QuestionId::new(1),
                pillar_id: PillarId::new(1),
                text: "What authentication methods do your users need?".to_string(),
            },
            ChecklistQuestion {
                id: QuestionId::new(2),
                pillar_id: PillarId::new(1),
                text: "Do you handle regulated or personally identifiable data?".to_string(),
            },
            ChecklistQuestion {
                id: QuestionId::new(3),
                pillar_id: PillarId::new(1),
                text: "What compliance standards apply to your project?".to_string(),
            },
            ChecklistQuestion {
                id: QuestionId::new(4),
                pillar_id: PillarId::new(2),
                text: "Do you prefer cloud hosting or on-premises deployment?".to_string(),
            },
            ChecklistQuestion {
                id: QuestionId::new(5),
                pillar_id: PillarId::new(2),
                text: "What peak load do you expect the system to handle?".to_string(),
            },
        ];
        Catalog::new(pillars, questions).unwrap()
    }
}
