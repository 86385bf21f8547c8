//! Error taxonomy for the arena core
//!
//! Every variant carries a stable code for API clients.

use std::time::Duration;
use thiserror::Error;

use crate::types::MatchStatus;

/// Result type for arena operations
pub type ArenaResult<T> = Result<T, ArenaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Profile, candidate, or match absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Match pool exhausted for this requester
    #[error("no eligible candidates available, try again later")]
    NoEligibleCandidates,

    #[error("match already exists for requester {requester_id} and candidate {candidate_id}")]
    DuplicateMatch {
        requester_id: String,
        candidate_id: String,
    },

    #[error("match {match_id} was already decided ({status})")]
    AlreadyDecided { match_id: String, status: MatchStatus },

    #[error("match {0} was flagged by safety review and cannot be approved")]
    SafetyBlocked(String),

    #[error("store query timed out after {0:?}")]
    Timeout(Duration),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ArenaError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::NoEligibleCandidates => "NO_PERSONAS",
            Self::DuplicateMatch { .. } => "DUPLICATE_MATCH",
            Self::AlreadyDecided { .. } => "ALREADY_DECIDED",
            Self::SafetyBlocked(_) => "SAFETY_BLOCKED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoEligibleCandidates | Self::Timeout(_) | Self::Storage(_)
        )
    }
}
