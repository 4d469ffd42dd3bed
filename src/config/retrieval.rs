//! Knowledge retrieval configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::ports::MAX_PASSAGES;

/// Knowledge retrieval configuration
///
/// When no index path is configured, retrieval is disabled and
/// generation runs without reference passages.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Path to the pre-built embedding index artifact (JSON)
    pub index_path: Option<PathBuf>,

    /// Passages to retrieve per generation request
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl RetrievalConfig {
    /// Validate retrieval configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_k == 0 || self.top_k > MAX_PASSAGES {
            return Err(ValidationError::InvalidTopK { max: MAX_PASSAGES });
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = RetrievalConfig::default();
        assert!(config.index_path.is_none());
        assert_eq!(config.top_k, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let config = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTopK { .. })));
    }

    #[test]
    fn top_k_above_cap_is_rejected() {
        let config = RetrievalConfig {
            top_k: MAX_PASSAGES + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
