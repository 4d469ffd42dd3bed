//! Prompt assets.
//!
//! Generation prompts live in a YAML file so they can be tuned without
//! a rebuild. A copy of the shipped asset is embedded as the fallback
//! when no override file is configured.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Shipped prompt asset, used when no override file is configured.
const BUILTIN_PROMPTS: &str = include_str!("../../assets/prompts.yaml");

/// Errors loading the prompt asset. Fatal at startup.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt file is not valid YAML: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("prompt '{0}' is empty")]
    EmptyPrompt(&'static str),
}

/// The prompts driving the recommendation generation step.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptSet {
    /// System prompt establishing the advisor role.
    pub recommender_system: String,
    /// User-message template with `{summary}` and `{passages}` slots.
    pub recommender_instructions: String,
}

impl PromptSet {
    /// Parses the embedded prompt asset.
    pub fn builtin() -> Result<Self, PromptError> {
        Self::parse(BUILTIN_PROMPTS)
    }

    /// Loads prompts from a YAML override file.
    pub fn load(path: &Path) -> Result<Self, PromptError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, PromptError> {
        let prompts: Self = serde_yaml::from_str(raw)?;
        if prompts.recommender_system.trim().is_empty() {
            return Err(PromptError::EmptyPrompt("recommender_system"));
        }
        if prompts.recommender_instructions.trim().is_empty() {
            return Err(PromptError::EmptyPrompt("recommender_instructions"));
        }
        Ok(prompts)
    }

    /// Fills the instruction template for one generation call.
    pub fn render_recommender(&self, summary: &str, passages: &str) -> String {
        let passages = if passages.trim().is_empty() {
            "(none)"
        } else {
            passages
        };
        self.recommender_instructions
            .replace("{summary}", summary)
            .replace("{passages}", passages)
    }
}
