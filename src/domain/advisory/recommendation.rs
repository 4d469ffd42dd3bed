//! Recommendation schema and model-reply parsing.
//!
//! The generation collaborator returns free text that must contain a
//! JSON object grouping recommendations by pillar. Malformed output is
//! rejected with [`GenerationError::Format`] rather than passed through
//! to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One pillar's recommendation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    /// Pillar or category name, e.g. "Security".
    pub pillar: String,
    /// Best-fit technology for the pillar.
    pub primary_choice: String,
    /// What the primary choice is used for.
    pub primary_use_case: String,
    /// One strong alternative.
    pub alternative_choice: String,
    /// What the alternative is used for.
    pub alternative_use_case: String,
    /// Why the primary choice fits this user's answers.
    pub justification: String,
}

/// A pillar-grouped technology stack recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Free-text introduction preceding the stack table.
    pub preamble: String,
    /// Entries ordered by pillar.
    pub entries: Vec<RecommendationEntry>,
}

impl Recommendation {
    /// Renders the recommendation as display text for the final turn.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.preamble.trim().is_empty() {
            out.push_str(self.preamble.trim());
            out.push_str("\n\n");
        }
        for entry in &self.entries {
            out.push_str(&format!(
                "{}\n  Recommended: {} ({})\n  Alternative: {} ({})\n  Why: {}\n\n",
                entry.pillar,
                entry.primary_choice,
                entry.primary_use_case,
                entry.alternative_choice,
                entry.alternative_use_case,
                entry.justification,
            ));
        }
        out.trim_end().to_string()
    }
}

/// Errors from the recommendation generation step.
///
/// Both variants are fatal to the turn but not to the session: the
/// phase does not advance and committed session data is unchanged.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The model reply could not be parsed into the recommendation schema.
    #[error("generation reply has invalid format: {0}")]
    Format(String),

    /// The model call itself failed (network, timeout, provider error).
    #[error("generation upstream failure: {0}")]
    Upstream(String),
}

/// Parses a model reply into a [`Recommendation`].
///
/// Accepts the JSON object bare or inside a fenced code block. Expected
/// shape, one key per pillar:
///
/// ```json
/// {
///   "preamble": "optional text",
///   "pillars": {
///     "Security": {
///       "top_recommendation": { "technology": "...", "use_case": "..." },
///       "alternative": { "technology": "...", "use_case": "..." },
///       "justification": "..."
///     }
///   }
/// }
/// ```
///
/// Entries are ordered by `pillar_order` where names match; categories
/// the model added beyond the catalog follow in reply order.
///
/// # Errors
///
/// - `Format` if no JSON object is found, the pillar grouping is
///   missing or empty, or any entry lacks a justification
pub fn parse_recommendation_reply(
    reply: &str,
    pillar_order: &[String],
) -> Result<Recommendation, GenerationError> {
    let json_text = extract_json_object(reply)
        .ok_or_else(|| GenerationError::Format("no JSON object in reply".to_string()))?;

    let root: Value = serde_json::from_str(json_text)
        .map_err(|e| GenerationError::Format(format!("invalid JSON: {}", e)))?;

    let preamble = root
        .get("preamble")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let pillars = root
        .get("pillars")
        .and_then(Value::as_object)
        .ok_or_else(|| GenerationError::Format("missing pillar grouping".to_string()))?;

    if pillars.is_empty() {
        return Err(GenerationError::Format("empty pillar grouping".to_string()));
    }

    let mut remaining: Vec<(&String, &Value)> = pillars.iter().collect();
    let mut entries = Vec::with_capacity(pillars.len());

    // Catalog pillars first, in canonical order.
    for name in pillar_order {
        if let Some(pos) = remaining.iter().position(|(key, _)| key.as_str() == name) {
            let (key, value) = remaining.remove(pos);
            entries.push(parse_entry(key, value)?);
        }
    }
    for (key, value) in remaining {
        entries.push(parse_entry(key, value)?);
    }

    Ok(Recommendation { preamble, entries })
}

fn parse_entry(pillar: &str, value: &Value) -> Result<RecommendationEntry, GenerationError> {
    let missing = |field: &str| {
        GenerationError::Format(format!("pillar '{}' is missing '{}'", pillar, field))
    };

    let choice = |key: &str| -> Result<(String, String), GenerationError> {
        let obj = value.get(key).ok_or_else(|| missing(key))?;
        // The model sometimes labels the field "tech stack" instead of
        // "technology"; accept both.
        let technology = obj
            .get("technology")
            .or_else(|| obj.get("tech stack"))
            .and_then(Value::as_str)
            .ok_or_else(|| missing(&format!("{}.technology", key)))?;
        let use_case = obj
            .get("use_case")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok((technology.to_string(), use_case.to_string()))
    };

    let (primary_choice, primary_use_case) = choice("top_recommendation")?;
    let (alternative_choice, alternative_use_case) = choice("alternative")?;

    let justification = value
        .get("justification")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing("justification"))?
        .to_string();

    Ok(RecommendationEntry {
        pillar: pillar.to_string(),
        primary_choice,
        primary_use_case,
        alternative_choice,
        alternative_use_case,
        justification,
    })
}

/// Finds the outermost JSON object in a reply, tolerating markdown
/// fences and surrounding prose.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end > start {
        Some(&reply[start..=end])
    } else {
        None
    }
}
