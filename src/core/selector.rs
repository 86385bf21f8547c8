//! Candidate Selector: picks a seed persona to simulate against
//!
//! Excluded: the requester and every candidate the requester already has a
//! match with. Selection is uniform over the (optionally capped) eligible set,
//! driven by an injected random source so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::store::ProfileStore;
use crate::types::{ArenaError, ArenaResult, Profile};

/// Selector tuning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Only the first N eligible personas are sampled
    pub sample_limit: Option<usize>,
    /// Default deadline for store queries (milliseconds)
    pub store_timeout_ms: Option<u64>,
}

impl SelectorConfig {
    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }
}

/// Candidate selector
#[derive(Debug)]
pub struct CandidateSelector<R = StdRng> {
    config: SelectorConfig,
    rng: Mutex<R>,
}

impl CandidateSelector<StdRng> {
    /// Selector seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible selector
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> CandidateSelector<R> {
    pub fn new(rng: R) -> Self {
        Self::with_config(SelectorConfig::default(), rng)
    }

    pub fn with_config(config: SelectorConfig, rng: R) -> Self {
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Pick a candidate for `requester_id`
    ///
    /// `timeout` bounds each store query; when None the configured default applies.
    pub async fn select<S>(
        &self,
        store: &S,
        requester_id: &str,
        explicit_candidate: Option<&str>,
        timeout: Option<Duration>,
    ) -> ArenaResult<Profile>
    where
        S: ProfileStore + ?Sized,
    {
        let timeout = timeout.or_else(|| self.config.store_timeout());

        let existing = with_deadline(timeout, store.list_matches_for(requester_id)).await?;
        let mut excluded: HashSet<String> =
            existing.into_iter().map(|m| m.candidate_id).collect();
        excluded.insert(requester_id.to_string());

        if let Some(candidate_id) = explicit_candidate {
            let persona = match with_deadline(timeout, store.get_profile(candidate_id)).await {
                Ok(profile) => profile,
                Err(ArenaError::NotFound(_)) => {
                    return Err(ArenaError::NotFound(format!("persona {}", candidate_id)))
                }
                Err(e) => return Err(e),
            };
            if !persona.is_seed || excluded.contains(&persona.id) {
                debug!(requester_id, candidate_id, "explicit candidate not eligible");
                return Err(ArenaError::NotFound(format!("persona {}", candidate_id)));
            }
            info!(requester_id, candidate_id, "explicit candidate selected");
            return Ok(persona);
        }

        let mut eligible = with_deadline(timeout, store.list_seed_profiles(&excluded)).await?;
        // Stores are not trusted to apply the exclusion set
        eligible.retain(|p| p.is_seed && !excluded.contains(&p.id));
        if let Some(limit) = self.config.sample_limit {
            eligible.truncate(limit);
        }
        if eligible.is_empty() {
            info!(requester_id, excluded = excluded.len(), "no eligible candidates");
            return Err(ArenaError::NoEligibleCandidates);
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..eligible.len())
        };
        let persona = eligible.swap_remove(index);
        info!(requester_id, candidate_id = %persona.id, pool = eligible.len() + 1, "candidate selected");
        Ok(persona)
    }
}

/// Run a store query, failing fast with `Timeout` when a deadline is given
async fn with_deadline<T, F>(timeout: Option<Duration>, query: F) -> ArenaResult<T>
where
    F: Future<Output = ArenaResult<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, query)
            .await
            .map_err(|_| ArenaError::Timeout(limit))?,
        None => query.await,
    }
}

// =============================================================================
// TESTS
// =============================================================================
