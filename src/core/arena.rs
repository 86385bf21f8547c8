//! Arena: the simulation pipeline behind "find me a match"
//!
//! select candidate → analyze → (transcript, safety collaborators) → persist
//!
//! Transcript and safety review come from optional external collaborators.
//! Without them the record carries an empty transcript and an explicit OK.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::analyzer::CompatibilityAnalyzer;
use crate::core::builder::MatchBuilder;
use crate::core::config::ArenaConfig;
use crate::core::consent::{ConsentAction, ConsentGate, ConsentOutcome, HashInviteIssuer};
use crate::core::profile::{confirm_hypothesis, merge_extraction};
use crate::core::selector::CandidateSelector;
use crate::core::store::ProfileStore;
use crate::types::{
    ArenaError, ArenaResult, Dossier, MatchResult, MatchSummary, Profile,
    ProfileExtraction, SafetyAssessment, SafetyStatus, Scenario, TranscriptEntry,
};
use crate::DOSSIER_RECENT_MATCHES;

/// Notes stored when the safety reviewer fails and OK is assumed
pub const SAFETY_FALLBACK_NOTES: &str = "Safety review unavailable - manual review needed";

/// Produces the simulated dialogue for a pair
#[async_trait]
pub trait TranscriptGenerator: Send + Sync {
    async fn generate(
        &self,
        scenario: Scenario,
        requester: &Profile,
        candidate: &Profile,
    ) -> ArenaResult<Vec<TranscriptEntry>>;
}

/// Reviews a pair (and its dialogue) for safety concerns
#[async_trait]
pub trait SafetyReviewer: Send + Sync {
    async fn review(
        &self,
        requester: &Profile,
        candidate: &Profile,
        transcript: &[TranscriptEntry],
    ) -> ArenaResult<SafetyAssessment>;
}

/// Public face of the matched persona
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateCard {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<&Profile> for CandidateCard {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: profile.display_name_or_anonymous().to_string(),
            photo_url: profile.photo_url.clone(),
        }
    }
}

/// Outcome of one arena run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArenaRun {
    pub match_result: MatchResult,
    pub shared_values: Vec<String>,
    pub candidate: CandidateCard,
}

/// The arena service
pub struct Arena<S: ProfileStore + ?Sized> {
    store: Arc<S>,
    analyzer: CompatibilityAnalyzer,
    selector: CandidateSelector,
    consent: ConsentGate<HashInviteIssuer>,
    transcripts: Option<Arc<dyn TranscriptGenerator>>,
    safety: Option<Arc<dyn SafetyReviewer>>,
    scenario: Scenario,
}

impl<S: ProfileStore + ?Sized> Arena<S> {
    pub fn new(store: Arc<S>, config: &ArenaConfig, selector: CandidateSelector) -> Self {
        Self {
            store,
            analyzer: CompatibilityAnalyzer::with_config(config.scoring.clone()),
            selector,
            consent: ConsentGate::with_issuer(HashInviteIssuer::with_expiry_days(
                config.invite_expiry_days,
            )),
            transcripts: None,
            safety: None,
            scenario: Scenario::default(),
        }
    }

    pub fn with_transcript_generator(mut self, generator: Arc<dyn TranscriptGenerator>) -> Self {
        self.transcripts = Some(generator);
        self
    }

    pub fn with_safety_reviewer(mut self, reviewer: Arc<dyn SafetyReviewer>) -> Self {
        self.safety = Some(reviewer);
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------

    /// Stored profile, or a fresh empty one for a first-time user
    pub async fn profile(&self, user_id: &str) -> ArenaResult<Profile> {
        match self.store.get_profile(user_id).await {
            Ok(profile) => Ok(profile),
            Err(ArenaError::NotFound(_)) => {
                info!(user_id, "creating empty profile");
                let create = Box::new(|_: &mut Profile| -> ArenaResult<()> { Ok(()) });
                self.store.update_profile(user_id, true, create).await
            }
            Err(e) => Err(e),
        }
    }

    /// Merge newly extracted data into the user's profile
    pub async fn apply_extraction(
        &self,
        user_id: &str,
        extraction: &ProfileExtraction,
    ) -> ArenaResult<Profile> {
        self.store
            .update_profile(
                user_id,
                true,
                Box::new(|profile: &mut Profile| -> ArenaResult<()> {
                    merge_extraction(profile, extraction);
                    Ok(())
                }),
            )
            .await
    }

    pub async fn confirm_hypothesis(
        &self,
        user_id: &str,
        claim: &str,
        confirmed: bool,
    ) -> ArenaResult<Profile> {
        self.store
            .update_profile(
                user_id,
                false,
                Box::new(move |profile: &mut Profile| confirm_hypothesis(profile, claim, confirmed)),
            )
            .await
    }

    // -------------------------------------------------------------------------
    // Simulation
    // -------------------------------------------------------------------------

    /// Select a candidate, score the pair and persist a PENDING match
    pub async fn run(
        &self,
        requester_id: &str,
        target_persona_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> ArenaResult<ArenaRun> {
        let requester = self.store.get_profile(requester_id).await?;
        let candidate = self
            .selector
            .select(self.store.as_ref(), requester_id, target_persona_id, timeout)
            .await?;

        let analysis = self.analyzer.analyze(&requester, &candidate);
        let transcript = self.transcript_for(&requester, &candidate).await;
        let safety = self.safety_for(&requester, &candidate, &transcript).await;

        let shared_values = analysis.shared_values.clone();
        let match_result = MatchBuilder::new(requester_id, candidate.id.as_str(), analysis)
            .transcript(transcript)
            .safety(safety)
            .scenario(self.scenario)
            .create(self.store.as_ref())
            .await?;

        Ok(ArenaRun {
            match_result,
            shared_values,
            candidate: CandidateCard::from(&candidate),
        })
    }

    async fn transcript_for(&self, requester: &Profile, candidate: &Profile) -> Vec<TranscriptEntry> {
        let Some(generator) = &self.transcripts else {
            return Vec::new();
        };
        debug!(
            scenario = self.scenario.title(),
            focus = self.scenario.focus(),
            candidate_id = %candidate.id,
            "requesting transcript"
        );
        match generator.generate(self.scenario, requester, candidate).await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!(error = %e, candidate_id = %candidate.id, "transcript generation failed, storing empty transcript");
                Vec::new()
            }
        }
    }

    async fn safety_for(
        &self,
        requester: &Profile,
        candidate: &Profile,
        transcript: &[TranscriptEntry],
    ) -> SafetyAssessment {
        let Some(reviewer) = &self.safety else {
            return SafetyAssessment::ok();
        };
        match reviewer.review(requester, candidate, transcript).await {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(error = %e, candidate_id = %candidate.id, "safety review failed, defaulting to OK with notes");
                SafetyAssessment {
                    status: SafetyStatus::Ok,
                    notes: Some(SAFETY_FALLBACK_NOTES.to_string()),
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Matches
    // -------------------------------------------------------------------------

    /// A match owned by `caller_id`
    pub async fn get_match(&self, caller_id: &str, match_id: &str) -> ArenaResult<MatchResult> {
        let record = self.store.get_match(match_id).await?;
        if record.requester_id != caller_id {
            return Err(ArenaError::NotFound(format!("match {}", match_id)));
        }
        Ok(record)
    }

    /// All of a requester's matches, newest first
    pub async fn list_matches(&self, caller_id: &str) -> ArenaResult<Vec<MatchSummary>> {
        let records = self.store.list_matches_for(caller_id).await?;
        let mut summaries = Vec::with_capacity(records.len());
        for record in &records {
            // A deleted candidate shows as anonymous; other store failures propagate
            let candidate = match self.store.get_profile(&record.candidate_id).await {
                Ok(profile) => Some(profile),
                Err(ArenaError::NotFound(_)) => None,
                Err(e) => return Err(e),
            };
            summaries.push(MatchSummary::new(record, candidate.as_ref()));
        }
        Ok(summaries)
    }

    /// Approve or reject a match
    pub async fn decide(
        &self,
        caller_id: &str,
        match_id: &str,
        action: ConsentAction,
    ) -> ArenaResult<ConsentOutcome> {
        self.consent
            .record_consent(self.store.as_ref(), caller_id, match_id, action, Utc::now())
            .await
    }

    /// Profile plus the most recent matches
    pub async fn dossier(&self, user_id: &str) -> ArenaResult<Dossier> {
        let profile = self.profile(user_id).await?;
        let mut recent_matches = self.list_matches(user_id).await?;
        recent_matches.truncate(DOSSIER_RECENT_MATCHES);
        Ok(Dossier {
            profile,
            recent_matches,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
