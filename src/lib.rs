//! Brea Arena: compatibility simulation between dating profiles
//!
//! Pipeline: CandidateSelector → CompatibilityAnalyzer → MatchBuilder → ConsentGate

pub mod core;
pub mod types;

// =============================================================================
// SCORE ARITHMETIC
// =============================================================================

/// Starting score before any evidence is counted
pub const SCORE_BASE: i32 = 50;

/// Points added per positive evidence entry
pub const SCORE_POSITIVE_WEIGHT: i32 = 10;

/// Points removed per friction evidence entry
pub const SCORE_FRICTION_WEIGHT: i32 = 15;

/// Score clamp bounds
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

// =============================================================================
// CONFIDENCE TIERS
// =============================================================================

/// HIGH requires at most this many unknowns...
pub const HIGH_CONFIDENCE_MAX_UNKNOWNS: usize = 1;

/// ...and at least this many positives
pub const HIGH_CONFIDENCE_MIN_POSITIVES: usize = 3;

/// LOW when unknowns reach this count
pub const LOW_CONFIDENCE_MIN_UNKNOWNS: usize = 3;

/// LOW when frictions reach this count
pub const LOW_CONFIDENCE_MIN_FRICTIONS: usize = 3;

/// Smallest unknown-topic catalog a config file may declare
pub const MIN_TOPIC_CATALOG: usize = 3;

// =============================================================================
// CONSENT / DOSSIER
// =============================================================================

/// Invite tokens stay valid for a week after approval (days)
pub const INVITE_EXPIRY_DAYS: i64 = 7;

/// Number of recent matches shown in a dossier
pub const DOSSIER_RECENT_MATCHES: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
