//! Pure transition functions of the advisory dialogue engine.
//!
//! [`respond`] maps (catalog, session, incoming message) to an updated
//! session copy plus either an outbound message or a directive telling
//! the imperative shell which I/O to perform. No network, clock-driven
//! branching, or storage access happens here, so every transition is
//! unit-testable in isolation.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::checklist::Catalog;
use crate::domain::foundation::{QuestionId, StateMachine, ValidationError};
use crate::domain::session::{Session, Turn};

use super::phase::AdvisoryPhase;
use super::recommendation::Recommendation;
use super::selector::next_questions;
use super::summarizer::{summarize, IntakeSummary};

/// I/O the imperative shell must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineDirective {
    /// Nothing to do; `EngineReply::message` is final.
    None,

    /// Retrieve knowledge and generate a recommendation for this
    /// summary, then finalize via [`finalize_recommendation`]. If the
    /// generation step fails, the updated session must be discarded.
    GenerateRecommendation(IntakeSummary),
}

/// Result of one engine transition.
#[derive(Debug, Clone)]
pub struct EngineReply {
    /// Updated session copy; committed by the caller after I/O succeeds.
    pub session: Session,
    /// Outbound message. Empty when a directive supplies the reply.
    pub message: String,
    /// I/O requested from the imperative shell.
    pub directive: EngineDirective,
}

/// Canned replies for recurrent small talk, answered without touching
/// the phase machine.
static STATIC_RESPONSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hello", "Hello! How can I assist you today?"),
        ("hi", "Hi there! How can I help you?"),
        ("are you online", "Yes, I am online and ready to assist you."),
        ("are you there", "Yes, I am here. How can I assist you?"),
        ("good morning", "Good morning! How can I help you today?"),
        ("good afternoon", "Good afternoon! How can I assist you today?"),
        ("good evening", "Good evening! How can I help you today?"),
    ])
});

/// Runs one transition of the phase machine.
///
/// # Errors
///
/// - `EmptyField` if the incoming message is blank; the session is untouched
pub fn respond(
    catalog: &Catalog,
    session: &Session,
    incoming: &str,
) -> Result<EngineReply, ValidationError> {
    let user_turn = Turn::user(incoming)?;
    let mut session = session.clone();
    session.push_turn(user_turn);

    let normalized = normalize(incoming);

    // Small-talk short-circuit everywhere but the opening phase, where
    // the intake prompt itself greets the user.
    if session.phase != AdvisoryPhase::IntakeInitiative {
        if let Some(reply) = STATIC_RESPONSES.get(normalized.as_str()) {
            return Ok(finish(session, (*reply).to_string()));
        }
    }

    match session.phase {
        AdvisoryPhase::IntakeInitiative => respond_intake(catalog, session, incoming, &normalized),
        AdvisoryPhase::IntakeChecklist => {
            respond_checklist(catalog, session, incoming, &normalized)
        }
        AdvisoryPhase::AwaitingSummaryConfirmation => {
            respond_confirmation(catalog, session, incoming, &normalized)
        }
        AdvisoryPhase::RecommendationReady => respond_ready(session),
    }
}

/// Completes a turn whose generation step succeeded: stores the
/// recommendation, advances the phase, and appends the final reply.
pub fn finalize_recommendation(
    session: &Session,
    recommendation: Recommendation,
) -> (Session, String) {
    let mut session = session.clone();
    let message = format!(
        "{}\n\nIf you want to explore a different direction, ask to start over.",
        recommendation.render()
    );
    session.recommendation = Some(recommendation);
    session.summary_confirmed = true;
    // Transition validity is guaranteed: the directive is only issued
    // from AwaitingSummaryConfirmation.
    if let Ok(next) = session.phase.transition_to(AdvisoryPhase::RecommendationReady) {
        session.phase = next;
    }
    append_assistant(&mut session, &message);
    (session, message)
}

fn respond_intake(
    catalog: &Catalog,
    mut session: Session,
    incoming: &str,
    normalized: &str,
) -> Result<EngineReply, ValidationError> {
    if session.initiative.as_deref().map_or(true, |s| s.trim().is_empty()) {
        if STATIC_RESPONSES.contains_key(normalized) {
            return Ok(finish(
                session,
                "Hello! I am your solution architect. To get started, tell me about \
                 your initiative: what do you want to build, and in which domain?"
                    .to_string(),
            ));
        }
        session.initiative = Some(incoming.trim().to_string());
        return Ok(finish(
            session,
            "Thanks. And which domain is this for (for example Education, \
             Healthcare, Finance)?"
                .to_string(),
        ));
    }

    // Initiative captured; this message supplies the domain. Small talk
    // must not be captured as the domain value.
    if STATIC_RESPONSES.contains_key(normalized) {
        return Ok(finish(
            session,
            "Hi! Which domain is your initiative for (for example Education, \
             Healthcare, Finance)?"
                .to_string(),
        ));
    }
    session.domain = Some(incoming.trim().to_string());
    debug_assert!(session.intake_complete());
    session.phase = session
        .phase
        .transition_to(AdvisoryPhase::IntakeChecklist)
        .map_err(|e| ValidationError::invalid_format("phase", e.to_string()))?;

    let questions = next_questions(catalog, &session);
    let message = format!(
        "Great, I have what I need to start the interview. {}",
        render_questions(&questions)
    );
    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    session.set_pending(ids);
    Ok(finish(session, message))
}

fn respond_checklist(
    catalog: &Catalog,
    mut session: Session,
    incoming: &str,
    normalized: &str,
) -> Result<EngineReply, ValidationError> {
    if let Some(pillar_ids) = skipped_pillars(catalog, normalized) {
        // Explicit pillar skip: mark every remaining question of the
        // named pillars as asked without recording answers.
        for pillar_id in pillar_ids {
            for question in catalog.questions_for_pillar(pillar_id) {
                session.mark_asked(question.id);
            }
        }
        session.clear_pending();
    } else if is_skip(normalized) {
        // Skip just the pending questions; they stay asked-but-unanswered.
        session.clear_pending();
    } else {
        // The reply addresses the questions posed together in the last
        // turn; record it against each of them.
        let pending: Vec<QuestionId> = session.pending_question_ids().to_vec();
        for id in pending {
            session.record_answer(id, incoming.trim());
        }
        session.clear_pending();
    }

    advance_checklist(catalog, session)
}

/// Offers the next questions or, once coverage is complete, presents
/// the summary and moves to confirmation.
fn advance_checklist(
    catalog: &Catalog,
    mut session: Session,
) -> Result<EngineReply, ValidationError> {
    let questions = next_questions(catalog, &session);
    if questions.is_empty() {
        session.phase = session
            .phase
            .transition_to(AdvisoryPhase::AwaitingSummaryConfirmation)
            .map_err(|e| ValidationError::invalid_format("phase", e.to_string()))?;
        let message = summarize(catalog, &session).render();
        return Ok(finish(session, message));
    }

    let message = render_questions(&questions);
    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    session.set_pending(ids);
    Ok(finish(session, message))
}

fn respond_confirmation(
    catalog: &Catalog,
    mut session: Session,
    incoming: &str,
    normalized: &str,
) -> Result<EngineReply, ValidationError> {
    // A dispute re-ask may have left questions pending; answer them
    // first, then re-present the summary once coverage is restored.
    if !session.pending_question_ids().is_empty() {
        let pending: Vec<QuestionId> = session.pending_question_ids().to_vec();
        if is_skip(normalized) {
            session.clear_pending();
        } else {
            for id in pending {
                session.record_answer(id, incoming.trim());
            }
            session.clear_pending();
        }

        let questions = next_questions(catalog, &session);
        if questions.is_empty() {
            let message = summarize(catalog, &session).render();
            return Ok(finish(session, message));
        }
        let message = render_questions(&questions);
        let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
        session.set_pending(ids);
        return Ok(finish(session, message));
    }

    if is_affirmative(normalized) {
        session.summary_confirmed = true;
        let summary = summarize(catalog, &session);
        return Ok(EngineReply {
            session,
            message: String::new(),
            directive: EngineDirective::GenerateRecommendation(summary),
        });
    }

    // Negative or ambiguous: targeted re-ask, phase unchanged.
    let disputed = disputed_pillars(catalog, normalized);
    if disputed.is_empty() {
        return Ok(finish(
            session,
            "No problem. Which part should I revisit? Name the area (for \
             example Security) or reply yes if the summary is correct after all."
                .to_string(),
        ));
    }

    let mut reopened = Vec::new();
    for pillar_id in &disputed {
        for question in catalog.questions_for_pillar(*pillar_id) {
            reopened.push(question.id);
        }
    }
    session.reopen_questions(&reopened);

    let questions = next_questions(catalog, &session);
    let message = format!(
        "Let's revisit those answers. {}",
        render_questions(&questions)
    );
    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    session.set_pending(ids);
    Ok(finish(session, message))
}

fn respond_ready(session: Session) -> Result<EngineReply, ValidationError> {
    let message = match &session.recommendation {
        Some(recommendation) => format!(
            "Here is the recommendation we arrived at:\n\n{}\n\nAsk to start \
             over if you want to explore a new initiative.",
            recommendation.render()
        ),
        // Unreachable in practice; the phase is only entered with a
        // recommendation stored.
        None => "This session is complete. Ask to start over to begin a new one.".to_string(),
    };
    Ok(finish(session, message))
}

fn finish(mut session: Session, message: String) -> EngineReply {
    append_assistant(&mut session, &message);
    EngineReply {
        session,
        message,
        directive: EngineDirective::None,
    }
}

fn append_assistant(session: &mut Session, message: &str) {
    if let Ok(turn) = Turn::assistant(message) {
        session.push_turn(turn);
    }
}

fn render_questions(questions: &[&crate::domain::checklist::ChecklistQuestion]) -> String {
    match questions {
        [only] => only.text.clone(),
        many => many
            .iter()
            .map(|q| q.text.as_str())
            .collect::<Vec<_>>()
            .join(" Also: "),
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase()
}

fn is_affirmative(normalized: &str) -> bool {
    const AFFIRMATIVE: &[&str] = &[
        "yes", "y", "yeah", "yep", "correct", "confirm", "confirmed", "right", "sure", "ok",
        "okay", "looks good", "that is correct", "that's correct", "proceed",
    ];
    AFFIRMATIVE.contains(&normalized)
}

fn is_skip(normalized: &str) -> bool {
    normalized == "skip"
        || normalized == "pass"
        || normalized == "next"
        || normalized.starts_with("skip ")
}

/// Pillars the user asked to skip outright, e.g. "skip the security pillar".
///
/// The match is anchored to messages that open with "skip"; an answer
/// that merely mentions skipping ("we can't skip security review")
/// is recorded as an answer, not a skip.
fn skipped_pillars(catalog: &Catalog, normalized: &str) -> Option<Vec<crate::domain::foundation::PillarId>> {
    if !normalized.starts_with("skip") {
        return None;
    }
    let named: Vec<_> = catalog
        .pillar_order()
        .iter()
        .filter(|p| normalized.contains(&p.name.to_lowercase()))
        .map(|p| p.id)
        .collect();
    if named.is_empty() {
        None
    } else {
        Some(named)
    }
}

/// Pillars named in a dispute message, e.g. "no, fix security answers".
fn disputed_pillars(catalog: &Catalog, normalized: &str) -> Vec<crate::domain::foundation::PillarId> {
    catalog
        .pillar_order()
        .iter()
        .filter(|p| normalized.contains(&p.name.to_lowercase()))
        .map(|p| p.id)
        .collect()
}
