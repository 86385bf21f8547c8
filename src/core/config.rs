//! Arena configuration file
//!
//! JSON, every field optional; missing fields take the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::analyzer::ScoringConfig;
use crate::core::selector::SelectorConfig;
use crate::types::{ArenaError, ArenaResult};
use crate::{INVITE_EXPIRY_DAYS, MIN_TOPIC_CATALOG};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub scoring: ScoringConfig,
    pub selector: SelectorConfig,
    pub invite_expiry_days: i64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            selector: SelectorConfig::default(),
            invite_expiry_days: INVITE_EXPIRY_DAYS,
        }
    }
}

impl ArenaConfig {
    /// Reject settings that make scoring or consent meaningless
    pub fn validate(&self) -> ArenaResult<()> {
        if self.scoring.topics.len() < MIN_TOPIC_CATALOG {
            return Err(ArenaError::Config(format!(
                "topic catalog needs at least {} entries, got {}",
                MIN_TOPIC_CATALOG,
                self.scoring.topics.len()
            )));
        }
        if self.scoring.topics.iter().any(|t| t.question.trim().is_empty()) {
            return Err(ArenaError::Config("topic question must not be empty".to_string()));
        }
        if self.scoring.positive_weight < 0 || self.scoring.friction_weight < 0 {
            return Err(ArenaError::Config("score weights must be non-negative".to_string()));
        }
        if self.invite_expiry_days <= 0 {
            return Err(ArenaError::Config("invite_expiry_days must be positive".to_string()));
        }
        if self.selector.sample_limit == Some(0) {
            return Err(ArenaError::Config("sample_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Load and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> ArenaResult<ArenaConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| ArenaError::Config(format!("{}: {}", path.display(), e)))?;
    let config: ArenaConfig = serde_json::from_str(&json)
        .map_err(|e| ArenaError::Config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}
