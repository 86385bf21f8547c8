//! Profile Store: the persistence boundary of the arena
//!
//! The store owns the transactional guarantees the core needs: at most one
//! MatchResult per (requester, candidate) pair, and profile updates that
//! never interleave.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use crate::types::{ArenaError, ArenaResult, Invite, MatchResult, MatchStatus, Profile};

/// Mutation applied to a profile while the store holds it exclusively
pub type ProfileUpdate<'a> = Box<dyn FnOnce(&mut Profile) -> ArenaResult<()> + Send + 'a>;

/// Storage interface for profiles and match records
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile (user or seed persona)
    async fn get_profile(&self, id: &str) -> ArenaResult<Profile>;

    /// Insert or replace a profile
    async fn save_profile(&self, profile: Profile) -> ArenaResult<Profile>;

    /// Read-modify-write a profile atomically. A missing profile is started
    /// empty when `create_missing` is set, otherwise `NotFound`. Nothing is
    /// written when `update` fails.
    async fn update_profile(
        &self,
        id: &str,
        create_missing: bool,
        update: ProfileUpdate<'_>,
    ) -> ArenaResult<Profile>;

    /// All seed personas whose id is not excluded
    async fn list_seed_profiles(&self, exclude_ids: &HashSet<String>) -> ArenaResult<Vec<Profile>>;

    /// Insert a new match; `DuplicateMatch` if the pair already has one
    async fn save_match(&self, record: MatchResult) -> ArenaResult<MatchResult>;

    async fn get_match(&self, id: &str) -> ArenaResult<MatchResult>;

    /// Matches owned by a requester, newest first
    async fn list_matches_for(&self, requester_id: &str) -> ArenaResult<Vec<MatchResult>>;

    /// Compare-and-set the status; `AlreadyDecided` if the current status is not `expected`
    async fn update_match_status(
        &self,
        id: &str,
        expected: MatchStatus,
        status: MatchStatus,
        invite: Option<Invite>,
    ) -> ArenaResult<MatchResult>;
}

#[derive(Debug, Default)]
struct MatchTable {
    by_id: HashMap<String, MatchResult>,
    /// (requester_id, candidate_id) → match id
    by_pair: HashMap<(String, String), String>,
}

/// In-memory store, deterministic and test-friendly
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<BTreeMap<String, Profile>>,
    matches: RwLock<MatchTable>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored match records
    pub fn match_count(&self) -> usize {
        self.matches.read().map(|t| t.by_id.len()).unwrap_or(0)
    }
}

fn poisoned(what: &str) -> ArenaError {
    ArenaError::Storage(format!("{} lock poisoned", what))
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, id: &str) -> ArenaResult<Profile> {
        let guard = self.profiles.read().map_err(|_| poisoned("profiles"))?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| ArenaError::NotFound(format!("profile {}", id)))
    }

    async fn save_profile(&self, profile: Profile) -> ArenaResult<Profile> {
        let mut guard = self.profiles.write().map_err(|_| poisoned("profiles"))?;
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: &str,
        create_missing: bool,
        update: ProfileUpdate<'_>,
    ) -> ArenaResult<Profile> {
        let mut guard = self.profiles.write().map_err(|_| poisoned("profiles"))?;
        let mut profile = match guard.get(id) {
            Some(existing) => existing.clone(),
            None if create_missing => Profile::new(id),
            None => return Err(ArenaError::NotFound(format!("profile {}", id))),
        };
        update(&mut profile)?;
        guard.insert(id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn list_seed_profiles(&self, exclude_ids: &HashSet<String>) -> ArenaResult<Vec<Profile>> {
        let guard = self.profiles.read().map_err(|_| poisoned("profiles"))?;
        Ok(guard
            .values()
            .filter(|p| p.is_seed && !exclude_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn save_match(&self, record: MatchResult) -> ArenaResult<MatchResult> {
        let mut table = self.matches.write().map_err(|_| poisoned("matches"))?;

        let pair = (record.requester_id.clone(), record.candidate_id.clone());
        if table.by_pair.contains_key(&pair) {
            return Err(ArenaError::DuplicateMatch {
                requester_id: pair.0,
                candidate_id: pair.1,
            });
        }
        if table.by_id.contains_key(&record.id) {
            return Err(ArenaError::Storage(format!("match id {} already in use", record.id)));
        }

        table.by_pair.insert(pair, record.id.clone());
        table.by_id.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_match(&self, id: &str) -> ArenaResult<MatchResult> {
        let table = self.matches.read().map_err(|_| poisoned("matches"))?;
        table
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ArenaError::NotFound(format!("match {}", id)))
    }

    async fn list_matches_for(&self, requester_id: &str) -> ArenaResult<Vec<MatchResult>> {
        let table = self.matches.read().map_err(|_| poisoned("matches"))?;
        let mut records: Vec<MatchResult> = table
            .by_id
            .values()
            .filter(|m| m.requester_id == requester_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn update_match_status(
        &self,
        id: &str,
        expected: MatchStatus,
        status: MatchStatus,
        invite: Option<Invite>,
    ) -> ArenaResult<MatchResult> {
        let mut table = self.matches.write().map_err(|_| poisoned("matches"))?;
        let record = table
            .by_id
            .get_mut(id)
            .ok_or_else(|| ArenaError::NotFound(format!("match {}", id)))?;

        if record.status != expected {
            return Err(ArenaError::AlreadyDecided {
                match_id: id.to_string(),
                status: record.status,
            });
        }

        record.status = status;
        if invite.is_some() {
            record.invite = invite;
        }
        Ok(record.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfidenceLevel, SafetyAssessment, Scenario};
    use chrono::Utc;

    fn record(id: &str, requester: &str, candidate: &str) -> MatchResult {
        MatchResult {
            id: id.to_string(),
            requester_id: requester.to_string(),
            candidate_id: candidate.to_string(),
            compatibility_score: 50,
            confidence_level: ConfidenceLevel::Low,
            why_matched: vec![],
            potential_friction: vec![],
            unknowns: vec![],
            transcript: vec![],
            safety: SafetyAssessment::ok(),
            scenario: Scenario::default(),
            status: MatchStatus::Pending,
            invite: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_pair_uniqueness() {
        let store = InMemoryStore::new();
        store.save_match(record("m1", "r", "c")).await.unwrap();

        let err = store.save_match(record("m2", "r", "c")).await.unwrap_err();
        assert!(matches!(err, ArenaError::DuplicateMatch { .. }));
        assert_eq!(store.match_count(), 1);

        // Reverse direction is a different pair
        store.save_match(record("m3", "c", "r")).await.unwrap();
        assert_eq!(store.match_count(), 2);
    }

    #[tokio::test]
    async fn test_seed_listing_excludes() {
        let store = InMemoryStore::new();
        store.save_profile(Profile::seed("s1", "Alex")).await.unwrap();
        store.save_profile(Profile::seed("s2", "Jordan")).await.unwrap();
        store.save_profile(Profile::new("u1")).await.unwrap();

        let exclude: HashSet<String> = ["s1".to_string()].into_iter().collect();
        let seeds = store.list_seed_profiles(&exclude).await.unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].id, "s2");
    }

    #[tokio::test]
    async fn test_status_compare_and_set() {
        let store = InMemoryStore::new();
        store.save_match(record("m1", "r", "c")).await.unwrap();

        let updated = store
            .update_match_status("m1", MatchStatus::Pending, MatchStatus::Rejected, None)
            .await
            .unwrap();
        assert_eq!(updated.status, MatchStatus::Rejected);

        let err = store
            .update_match_status("m1", MatchStatus::Pending, MatchStatus::Approved, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ArenaError::AlreadyDecided { match_id: "m1".into(), status: MatchStatus::Rejected }
        );
    }

    #[tokio::test]
    async fn test_update_profile_commits_only_on_success() {
        let store = InMemoryStore::new();
        let created = store
            .update_profile("u1", true, Box::new(|p: &mut Profile| -> ArenaResult<()> {
                p.values.push("Family".into());
                Ok(())
            }))
            .await
            .unwrap();
        assert_eq!(created.values, vec!["Family".to_string()]);

        let failed = store
            .update_profile("u1", false, Box::new(|p: &mut Profile| -> ArenaResult<()> {
                p.values.clear();
                Err(ArenaError::NotFound("hypothesis".into()))
            }))
            .await;
        assert!(failed.is_err());
        assert_eq!(store.get_profile("u1").await.unwrap().values, vec!["Family".to_string()]);

        assert!(matches!(
            store.update_profile("ghost", false, Box::new(|_: &mut Profile| -> ArenaResult<()> { Ok(()) })).await,
            Err(ArenaError::NotFound(_))
        ));
        assert!(matches!(store.get_profile("ghost").await, Err(ArenaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_records() {
        let store = InMemoryStore::new();
        assert!(matches!(store.get_profile("nope").await, Err(ArenaError::NotFound(_))));
        assert!(matches!(store.get_match("nope").await, Err(ArenaError::NotFound(_))));
    }
}
