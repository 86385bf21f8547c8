//! Match records and their lifecycle
//!
//! A MatchResult is created once per simulation run with status PENDING.
//! Status moves to APPROVED or REJECTED exactly once, through the consent gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConfidenceLevel, Profile, Unknown};

/// Lifecycle of a match record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl MatchStatus {
    /// Only PENDING accepts a consent decision
    pub fn is_decided(&self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::Approved => "APPROVED",
            MatchStatus::Rejected => "REJECTED",
            MatchStatus::Expired => "EXPIRED",
        };
        write!(f, "{}", name)
    }
}

/// Speaker in a simulated dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRole {
    #[serde(rename = "AGENT_A")]
    AgentA,
    #[serde(rename = "AGENT_B")]
    AgentB,
}

/// One line of a simulated dialogue, stored opaquely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: AgentRole,
    pub content: String,
    /// Unix milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl TranscriptEntry {
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStatus {
    Ok,
    Flagged,
}

/// Safety review outcome attached to every match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub status: SafetyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SafetyAssessment {
    /// Explicit OK marker used when no reviewer is wired in
    pub fn ok() -> Self {
        Self { status: SafetyStatus::Ok, notes: None }
    }

    pub fn flagged(notes: impl Into<String>) -> Self {
        Self {
            status: SafetyStatus::Flagged,
            notes: Some(notes.into()),
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.status == SafetyStatus::Flagged
    }
}

impl Default for SafetyAssessment {
    fn default() -> Self {
        Self::ok()
    }
}

/// Simulated date scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    #[default]
    LifestyleCompatibility,
    ConflictResolution,
    EnergyMatch,
}

impl Scenario {
    pub fn title(&self) -> &'static str {
        match self {
            Scenario::LifestyleCompatibility => "The 10AM Saturday Plan",
            Scenario::ConflictResolution => "The Restaurant Disagreement",
            Scenario::EnergyMatch => "The Weekend Adventure",
        }
    }

    /// What the simulated conversation should focus on
    pub fn focus(&self) -> &'static str {
        match self {
            Scenario::LifestyleCompatibility => "energy levels, planning preferences, and lifestyle compatibility",
            Scenario::ConflictResolution => "conflict style, communication patterns, and compromise ability",
            Scenario::EnergyMatch => "spontaneity vs planning, energy matching, and excitement levels",
        }
    }
}

/// Opaque invite bound to an approved match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub token: String,
    pub match_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invite {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Persisted outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    /// Owner of the record
    pub requester_id: String,
    /// Referenced, not owned
    pub candidate_id: String,
    pub compatibility_score: u8,
    pub confidence_level: ConfidenceLevel,
    pub why_matched: Vec<String>,
    pub potential_friction: Vec<String>,
    pub unknowns: Vec<Unknown>,
    pub transcript: Vec<TranscriptEntry>,
    pub safety: SafetyAssessment,
    #[serde(default)]
    pub scenario: Scenario,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<Invite>,
    pub created_at: DateTime<Utc>,
}

/// Compact view of a match for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub compatibility_score: u8,
    pub confidence_level: ConfidenceLevel,
    pub status: MatchStatus,
    pub candidate_id: String,
    pub candidate_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MatchSummary {
    /// Build from a record and the candidate's profile, if still present
    pub fn new(record: &MatchResult, candidate: Option<&Profile>) -> Self {
        Self {
            id: record.id.clone(),
            compatibility_score: record.compatibility_score,
            confidence_level: record.confidence_level,
            status: record.status,
            candidate_id: record.candidate_id.clone(),
            candidate_name: candidate
                .map(|p| p.display_name_or_anonymous().to_string())
                .unwrap_or_else(|| "Anonymous".to_string()),
            candidate_photo_url: candidate.and_then(|p| p.photo_url.clone()),
            created_at: record.created_at,
        }
    }
}

/// A user's profile plus their most recent matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub profile: Profile,
    pub recent_matches: Vec<MatchSummary>,
}
