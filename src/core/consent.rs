//! Consent Gate: approve/reject decision on a PENDING match
//!
//! - Only the owner (requester) can decide
//! - A decision happens once; later attempts fail with AlreadyDecided
//! - A FLAGGED safety review blocks approval
//! - Approval mints an invite that expires after a fixed window

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::core::store::ProfileStore;
use crate::types::{ArenaError, ArenaResult, Invite, MatchResult, MatchStatus};
use crate::INVITE_EXPIRY_DAYS;

/// Decision on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentAction {
    Approve,
    Reject,
}

impl ConsentAction {
    fn target_status(&self) -> MatchStatus {
        match self {
            ConsentAction::Approve => MatchStatus::Approved,
            ConsentAction::Reject => MatchStatus::Rejected,
        }
    }
}

/// Mints invite tokens for approved matches
pub trait InviteIssuer: Send + Sync {
    fn issue(&self, match_id: &str, now: DateTime<Utc>) -> Invite;
}

/// SHA-256 over match id, a random nonce and the issue time
#[derive(Debug, Clone)]
pub struct HashInviteIssuer {
    expiry: Duration,
}

impl Default for HashInviteIssuer {
    fn default() -> Self {
        Self::with_expiry_days(INVITE_EXPIRY_DAYS)
    }
}

impl HashInviteIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiry_days(days: i64) -> Self {
        Self {
            expiry: Duration::days(days),
        }
    }
}

impl InviteIssuer for HashInviteIssuer {
    fn issue(&self, match_id: &str, now: DateTime<Utc>) -> Invite {
        let nonce: [u8; 16] = rand::thread_rng().gen();

        let mut hasher = Sha256::new();
        hasher.update(match_id.as_bytes());
        hasher.update(nonce);
        hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
        let digest = hasher.finalize();
        let token: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

        Invite {
            token,
            match_id: match_id.to_string(),
            issued_at: now,
            expires_at: now + self.expiry,
        }
    }
}

/// Result of a successful decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentOutcome {
    pub record: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<Invite>,
}

/// Consent gate
#[derive(Debug, Default)]
pub struct ConsentGate<I = HashInviteIssuer> {
    issuer: I,
}

impl ConsentGate<HashInviteIssuer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: InviteIssuer> ConsentGate<I> {
    pub fn with_issuer(issuer: I) -> Self {
        Self { issuer }
    }

    /// Record `caller_id`'s decision on `match_id`
    pub async fn record_consent<S>(
        &self,
        store: &S,
        caller_id: &str,
        match_id: &str,
        action: ConsentAction,
        now: DateTime<Utc>,
    ) -> ArenaResult<ConsentOutcome>
    where
        S: ProfileStore + ?Sized,
    {
        let record = store.get_match(match_id).await?;
        if record.requester_id != caller_id {
            return Err(ArenaError::NotFound(format!("match {}", match_id)));
        }
        if record.status.is_decided() {
            return Err(ArenaError::AlreadyDecided {
                match_id: match_id.to_string(),
                status: record.status,
            });
        }
        if action == ConsentAction::Approve && record.safety.is_flagged() {
            warn!(match_id, notes = ?record.safety.notes, "approval blocked by safety review");
            return Err(ArenaError::SafetyBlocked(match_id.to_string()));
        }

        let invite = match action {
            ConsentAction::Approve => Some(self.issuer.issue(match_id, now)),
            ConsentAction::Reject => None,
        };

        // Pending → decided is a compare-and-set; a racing decision loses here
        let record = store
            .update_match_status(match_id, MatchStatus::Pending, action.target_status(), invite.clone())
            .await?;

        info!(match_id, caller_id, status = %record.status, invite = invite.is_some(), "consent recorded");
        Ok(ConsentOutcome { record, invite })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_expiry_window() {
        let now = Utc::now();
        let invite = HashInviteIssuer::new().issue("m1", now);

        assert_eq!(invite.match_id, "m1");
        assert_eq!(invite.token.len(), 64);
        assert_eq!(invite.expires_at - invite.issued_at, Duration::days(7));
        assert!(!invite.is_expired(now + Duration::days(6)));
        assert!(invite.is_expired(now + Duration::days(7)));
    }

    #[test]
    fn test_tokens_differ_per_issue() {
        let now = Utc::now();
        let issuer = HashInviteIssuer::new();
        assert_ne!(issuer.issue("m1", now).token, issuer.issue("m1", now).token);
    }

    #[test]
    fn test_action_serde() {
        let action: ConsentAction = serde_json::from_str("\"APPROVE\"").unwrap();
        assert_eq!(action, ConsentAction::Approve);
        assert_eq!(action.target_status(), MatchStatus::Approved);
    }
}
