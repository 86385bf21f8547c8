//! Core modules for Brea Arena

pub mod analyzer;
pub mod api;
pub mod arena;
pub mod builder;
pub mod config;
pub mod consent;
pub mod profile;
pub mod seed;
pub mod selector;
pub mod store;

pub use analyzer::{default_topics, CompatibilityAnalyzer, ScoringConfig};
pub use api::{create_router, run_server, SharedArena};
pub use arena::{Arena, ArenaRun, CandidateCard, SafetyReviewer, TranscriptGenerator};
pub use builder::{create_match, MatchBuilder};
pub use config::{load_config, ArenaConfig};
pub use consent::{ConsentAction, ConsentGate, ConsentOutcome, HashInviteIssuer, InviteIssuer};
pub use profile::{chips_to_extraction, confirm_hypothesis, merge_extraction, overlay_tags};
pub use seed::{seed_personas, seed_profiles};
pub use selector::{CandidateSelector, SelectorConfig};
pub use store::{InMemoryStore, ProfileStore, ProfileUpdate};
