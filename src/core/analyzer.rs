//! Compatibility Analyzer: scores one profile against another
//!
//! Rules, in order:
//! 1. Shared values (case-insensitive) → one positive
//! 2. Requester dealbreaker found inside a candidate value → one friction per hit
//! 3. Personality axes (energy, humor, planning, conflict) → at most one entry each
//! 4. Catalog topics neither side mentions → unknowns
//!
//! score = clamp(0, 100, base + positive_weight × |positives| − friction_weight × |frictions|)
//!
//! Pure: no I/O, same inputs give the same output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    HIGH_CONFIDENCE_MAX_UNKNOWNS, HIGH_CONFIDENCE_MIN_POSITIVES, LOW_CONFIDENCE_MIN_FRICTIONS,
    LOW_CONFIDENCE_MIN_UNKNOWNS, SCORE_BASE, SCORE_FRICTION_WEIGHT, SCORE_MAX, SCORE_MIN,
    SCORE_POSITIVE_WEIGHT,
};
use crate::types::{
    AnalysisResult, ConfidenceLevel, ConflictStyle, Energy, Humor, Planning, Profile, Unknown,
};

/// Weights, thresholds and the unknown-topic catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base: i32,
    pub positive_weight: i32,
    pub friction_weight: i32,
    pub high_max_unknowns: usize,
    pub high_min_positives: usize,
    pub low_min_unknowns: usize,
    pub low_min_frictions: usize,
    /// Topics surfaced as unknowns when neither profile covers them
    pub topics: Vec<Unknown>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: SCORE_BASE,
            positive_weight: SCORE_POSITIVE_WEIGHT,
            friction_weight: SCORE_FRICTION_WEIGHT,
            high_max_unknowns: HIGH_CONFIDENCE_MAX_UNKNOWNS,
            high_min_positives: HIGH_CONFIDENCE_MIN_POSITIVES,
            low_min_unknowns: LOW_CONFIDENCE_MIN_UNKNOWNS,
            low_min_frictions: LOW_CONFIDENCE_MIN_FRICTIONS,
            topics: default_topics(),
        }
    }
}

/// Built-in topic catalog
pub fn default_topics() -> Vec<Unknown> {
    vec![
        Unknown::new(
            "Do they want kids someday?",
            "Neither profile says anything about children",
        ),
        Unknown::new(
            "How important is religion or spirituality?",
            "Beliefs have not come up for either person",
        ),
        Unknown::new(
            "Where do they see themselves living long-term?",
            "No information about location plans",
        ),
    ]
}

/// Outcome of a single heuristic
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Positive(String),
    Friction(String),
}

/// Compatibility analyzer
#[derive(Debug, Clone, Default)]
pub struct CompatibilityAnalyzer {
    config: ScoringConfig,
}

impl CompatibilityAnalyzer {
    /// Analyzer with the default weights and catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Compare requester against candidate
    pub fn analyze(&self, requester: &Profile, candidate: &Profile) -> AnalysisResult {
        let mut positives = Vec::new();
        let mut frictions = Vec::new();

        let shared_values = shared_values(&requester.values, &candidate.values);
        if !shared_values.is_empty() {
            positives.push(format!("Shared values: {}", shared_values.join(", ")));
        }

        frictions.extend(dealbreaker_conflicts(&requester.dealbreakers, &candidate.values));

        let ours = &requester.personality_tags;
        let theirs = &candidate.personality_tags;
        let verdicts = [
            compare_energy(ours.energy, theirs.energy),
            compare_humor(ours.humor, theirs.humor),
            compare_planning(ours.planning, theirs.planning),
            compare_conflict(ours.conflict, theirs.conflict),
        ];
        for verdict in verdicts.into_iter().flatten() {
            match verdict {
                Verdict::Positive(text) => positives.push(text),
                Verdict::Friction(text) => frictions.push(text),
            }
        }

        let unknowns: Vec<Unknown> = self
            .config
            .topics
            .iter()
            .filter(|topic| {
                !topic_covered(&topic.question, &requester.values)
                    && !topic_covered(&topic.question, &candidate.values)
            })
            .cloned()
            .collect();

        let score = self.score(positives.len(), frictions.len());
        let confidence = self.confidence(positives.len(), frictions.len(), unknowns.len());

        debug!(
            requester_id = %requester.id,
            candidate_id = %candidate.id,
            positives = positives.len(),
            frictions = frictions.len(),
            unknowns = unknowns.len(),
            score,
            %confidence,
            "analysis complete"
        );

        AnalysisResult {
            positives,
            frictions,
            unknowns,
            shared_values,
            score,
            confidence,
        }
    }

    /// Weighted evidence count, clamped to [0, 100]
    pub fn score(&self, positives: usize, frictions: usize) -> u8 {
        let raw = i64::from(self.config.base)
            + i64::from(self.config.positive_weight) * positives as i64
            - i64::from(self.config.friction_weight) * frictions as i64;
        raw.clamp(i64::from(SCORE_MIN), i64::from(SCORE_MAX)) as u8
    }

    /// HIGH is checked before LOW
    pub fn confidence(&self, positives: usize, frictions: usize, unknowns: usize) -> ConfidenceLevel {
        let c = &self.config;
        if unknowns <= c.high_max_unknowns && positives >= c.high_min_positives {
            ConfidenceLevel::High
        } else if unknowns >= c.low_min_unknowns || frictions >= c.low_min_frictions {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Medium
        }
    }
}

/// Requester values also held by the candidate, deduplicated case-insensitively
fn shared_values(ours: &[String], theirs: &[String]) -> Vec<String> {
    let theirs_lower: Vec<String> = theirs.iter().map(|v| v.trim().to_lowercase()).collect();
    let mut seen: Vec<String> = Vec::new();
    let mut shared = Vec::new();

    for value in ours {
        let key = value.trim().to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        if theirs_lower.contains(&key) {
            shared.push(value.trim().to_string());
        }
        seen.push(key);
    }
    shared
}

/// One friction per (dealbreaker, candidate value) substring hit
fn dealbreaker_conflicts(dealbreakers: &[String], values: &[String]) -> Vec<String> {
    let mut frictions = Vec::new();
    for dealbreaker in dealbreakers {
        let needle = dealbreaker.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for value in values {
            if value.to_lowercase().contains(&needle) {
                frictions.push(format!(
                    "Dealbreaker \"{}\" conflicts with their value \"{}\"",
                    dealbreaker.trim(),
                    value.trim()
                ));
            }
        }
    }
    frictions
}

/// Whether any non-empty value mentions the topic (either direction)
fn topic_covered(question: &str, values: &[String]) -> bool {
    let question = question.to_lowercase();
    values.iter().any(|value| {
        let value = value.trim().to_lowercase();
        !value.is_empty() && (question.contains(&value) || value.contains(&question))
    })
}

fn compare_energy(ours: Option<Energy>, theirs: Option<Energy>) -> Option<Verdict> {
    match (ours?, theirs?) {
        (a, b) if a == b => Some(Verdict::Positive(format!("Matching energy levels ({})", a))),
        (a @ Energy::Chill, b @ Energy::High) | (a @ Energy::High, b @ Energy::Chill) => {
            Some(Verdict::Friction(format!("Energy mismatch ({} vs {})", a, b)))
        }
        _ => None,
    }
}

fn compare_humor(ours: Option<Humor>, theirs: Option<Humor>) -> Option<Verdict> {
    match (ours?, theirs?) {
        (a, b) if a == b => Some(Verdict::Positive(format!("Matching humor style ({})", a))),
        _ => None,
    }
}

fn compare_planning(ours: Option<Planning>, theirs: Option<Planning>) -> Option<Verdict> {
    match (ours?, theirs?) {
        (a, b) if a == b => Some(Verdict::Positive(format!("Matching planning style ({})", a))),
        (a, b) => Some(Verdict::Friction(format!("Planning style mismatch ({} vs {})", a, b))),
    }
}

fn compare_conflict(ours: Option<ConflictStyle>, theirs: Option<ConflictStyle>) -> Option<Verdict> {
    use ConflictStyle::*;

    match (ours?, theirs?) {
        (Collaborative, Collaborative) => Some(Verdict::Positive(
            "Compatible conflict styles (both collaborative)".to_string(),
        )),
        (Direct, Avoidant) => Some(Verdict::Friction(
            "Conflict style mismatch: direct vs avoidant".to_string(),
        )),
        (Direct, other) => Some(Verdict::Positive(format!(
            "Compatible conflict styles (direct with {})",
            other
        ))),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
