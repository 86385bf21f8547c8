//! Match Record Builder: packages analyzer output into a persisted MatchResult
//!
//! Records start PENDING. Uniqueness per (requester, candidate) is enforced
//! by the store at insert time, so concurrent runs cannot both succeed.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::store::ProfileStore;
use crate::types::{
    AnalysisResult, ArenaError, ArenaResult, MatchResult, MatchStatus, SafetyAssessment, Scenario,
    TranscriptEntry,
};

/// Builder for a single match record
#[derive(Debug, Clone)]
pub struct MatchBuilder {
    requester_id: String,
    candidate_id: String,
    analysis: AnalysisResult,
    transcript: Vec<TranscriptEntry>,
    safety: SafetyAssessment,
    scenario: Scenario,
}

impl MatchBuilder {
    /// Empty transcript and an explicit OK safety marker until told otherwise
    pub fn new(
        requester_id: impl Into<String>,
        candidate_id: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            requester_id: requester_id.into(),
            candidate_id: candidate_id.into(),
            analysis,
            transcript: Vec::new(),
            safety: SafetyAssessment::ok(),
            scenario: Scenario::default(),
        }
    }

    pub fn transcript(mut self, transcript: Vec<TranscriptEntry>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn safety(mut self, safety: SafetyAssessment) -> Self {
        self.safety = safety;
        self
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Assemble the record without persisting it
    pub fn build(self, created_at: DateTime<Utc>) -> MatchResult {
        MatchResult {
            id: Uuid::new_v4().to_string(),
            requester_id: self.requester_id,
            candidate_id: self.candidate_id,
            compatibility_score: self.analysis.score,
            confidence_level: self.analysis.confidence,
            why_matched: self.analysis.positives,
            potential_friction: self.analysis.frictions,
            unknowns: self.analysis.unknowns,
            transcript: self.transcript,
            safety: self.safety,
            scenario: self.scenario,
            status: MatchStatus::Pending,
            invite: None,
            created_at,
        }
    }

    /// Build and insert; `DuplicateMatch` if the pair already has a record
    pub async fn create<S>(self, store: &S) -> ArenaResult<MatchResult>
    where
        S: ProfileStore + ?Sized,
    {
        let record = self.build(Utc::now());
        match store.save_match(record).await {
            Ok(saved) => {
                info!(
                    match_id = %saved.id,
                    requester_id = %saved.requester_id,
                    candidate_id = %saved.candidate_id,
                    score = saved.compatibility_score,
                    confidence = %saved.confidence_level,
                    "match created"
                );
                Ok(saved)
            }
            Err(err @ ArenaError::DuplicateMatch { .. }) => {
                warn!(error = %err, "duplicate match rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

/// Persist a PENDING match with no transcript and default safety
pub async fn create_match<S>(
    store: &S,
    requester_id: &str,
    candidate_id: &str,
    analysis: AnalysisResult,
) -> ArenaResult<MatchResult>
where
    S: ProfileStore + ?Sized,
{
    MatchBuilder::new(requester_id, candidate_id, analysis).create(store).await
}

// =============================================================================
// TESTS
// =============================================================================
