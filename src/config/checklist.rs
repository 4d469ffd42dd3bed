//! Checklist catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Checklist catalog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistConfig {
    /// Path to the pillar questions CSV
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
}

impl ChecklistConfig {
    /// Validate checklist configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("CHECKLIST__QUESTIONS_PATH"));
        }
        Ok(())
    }
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            questions_path: default_questions_path(),
        }
    }
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("data/pillar_questions.csv")
}
