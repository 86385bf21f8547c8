//! Profile merge-on-write
//!
//! Values and dealbreakers stay free of case-insensitive duplicates,
//! first spelling wins. Personality axes from the newer extraction override.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{
    ArenaError, ArenaResult, ChipKind, IntelligenceChip, PersonalityTags, Profile,
    ProfileExtraction,
};

lazy_static! {
    // First alphabetic word of a chip label: "Chill 😌" → "Chill", "Dry Humor" → "Dry"
    static ref RE_LABEL_WORD: Regex = Regex::new(r"(?i)[a-z]+").unwrap();
}

/// Merge an extraction into a profile in place
pub fn merge_extraction(profile: &mut Profile, extraction: &ProfileExtraction) {
    merge_unique(&mut profile.values, &extraction.values);
    merge_unique(&mut profile.dealbreakers, &extraction.dealbreakers);
    profile.personality_tags = overlay_tags(&profile.personality_tags, &extraction.personality_tags);

    for hypothesis in &extraction.hypotheses {
        let claim = hypothesis.claim.to_lowercase();
        if !profile.hypotheses.iter().any(|h| h.claim.to_lowercase() == claim) {
            profile.hypotheses.push(hypothesis.clone());
        }
    }

    for gap in &extraction.knowledge_gaps {
        let question = gap.question.to_lowercase();
        if !profile.knowledge_gaps.iter().any(|g| g.question.to_lowercase() == question) {
            profile.knowledge_gaps.push(gap.clone());
        }
    }

    if extraction.display_name.is_some() {
        profile.display_name = extraction.display_name.clone();
    }
    if extraction.photo_url.is_some() {
        profile.photo_url = extraction.photo_url.clone();
    }
}

/// Append entries not already present (case-insensitive, trimmed); blanks are dropped
fn merge_unique(existing: &mut Vec<String>, incoming: &[String]) {
    let mut keys: Vec<String> = Vec::with_capacity(existing.len() + incoming.len());
    existing.retain_mut(|value| {
        let key = value.trim().to_lowercase();
        if key.is_empty() || keys.contains(&key) {
            return false;
        }
        *value = value.trim().to_string();
        keys.push(key);
        true
    });
    for entry in incoming {
        let trimmed = entry.trim();
        let key = trimmed.to_lowercase();
        if key.is_empty() || keys.contains(&key) {
            continue;
        }
        keys.push(key);
        existing.push(trimmed.to_string());
    }
}

/// Set axes in `newer` win, unset axes keep the older value
pub fn overlay_tags(older: &PersonalityTags, newer: &PersonalityTags) -> PersonalityTags {
    PersonalityTags {
        humor: newer.humor.or(older.humor),
        energy: newer.energy.or(older.energy),
        planning: newer.planning.or(older.planning),
        conflict: newer.conflict.or(older.conflict),
    }
}

/// Mark every hypothesis matching `claim` (case-insensitive) as confirmed or rejected
pub fn confirm_hypothesis(profile: &mut Profile, claim: &str, confirmed: bool) -> ArenaResult<()> {
    let key = claim.to_lowercase();
    let mut hits = 0;
    for hypothesis in profile.hypotheses.iter_mut() {
        if hypothesis.claim.to_lowercase() == key {
            hypothesis.confirmed = Some(confirmed);
            hits += 1;
        }
    }
    if hits == 0 {
        return Err(ArenaError::NotFound(format!("hypothesis \"{}\"", claim)));
    }
    Ok(())
}

/// Convert live chips into an extraction; unparseable axis labels are dropped
pub fn chips_to_extraction(chips: &[IntelligenceChip]) -> ProfileExtraction {
    let mut extraction = ProfileExtraction::default();
    let tags = &mut extraction.personality_tags;

    for chip in chips {
        let word = label_word(&chip.label);
        match chip.kind {
            ChipKind::Value => extraction.values.push(chip.label.trim().to_string()),
            ChipKind::Dealbreaker => extraction.dealbreakers.push(chip.label.trim().to_string()),
            ChipKind::Energy => tags.energy = word.and_then(|w| w.parse().ok()).or(tags.energy),
            ChipKind::Humor => tags.humor = word.and_then(|w| w.parse().ok()).or(tags.humor),
            ChipKind::Planning => tags.planning = word.and_then(|w| w.parse().ok()).or(tags.planning),
            ChipKind::Conflict => tags.conflict = word.and_then(|w| w.parse().ok()).or(tags.conflict),
        }
    }

    extraction
}

fn label_word(label: &str) -> Option<&str> {
    RE_LABEL_WORD.find(label).map(|m| m.as_str())
}

// =============================================================================
// TESTS
// =============================================================================
