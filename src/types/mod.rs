//! Core types for Brea Arena

mod analysis;
mod error;
mod match_result;
mod profile;

pub use analysis::{AnalysisResult, ConfidenceLevel, Unknown};
pub use error::{ArenaError, ArenaResult};
pub use match_result::{
    AgentRole, Dossier, Invite, MatchResult, MatchStatus, MatchSummary, SafetyAssessment,
    SafetyStatus, Scenario, TranscriptEntry,
};
pub use profile::{
    ChipKind, ConflictStyle, Energy, Humor, Hypothesis, IntelligenceChip, KnowledgeGap,
    PersonalityTags, Planning, Profile, ProfileExtraction, UnknownAxisValue,
};
