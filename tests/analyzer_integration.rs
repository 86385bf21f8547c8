//! Integration tests for the Compatibility Analyzer
//!
//! Tests the full path: profiles → analyze → evidence, score, confidence

use brea_arena::core::{CompatibilityAnalyzer, ScoringConfig};
use brea_arena::types::{
    ConfidenceLevel, ConflictStyle, Energy, Humor, PersonalityTags, Planning, Profile,
};
use pretty_assertions::assert_eq;

fn tags(energy: Option<Energy>, humor: Option<Humor>) -> PersonalityTags {
    PersonalityTags {
        energy,
        humor,
        ..Default::default()
    }
}

/// Requester/candidate pair from the product walkthrough
#[test]
fn test_walkthrough_pair() {
    let requester = Profile::new("r")
        .with_values(["Family", "Career"])
        .with_dealbreakers(["Smoking"])
        .with_tags(tags(Some(Energy::Chill), None));
    let candidate = Profile::new("c")
        .with_values(["Family", "Travel"])
        .with_tags(tags(Some(Energy::Chill), Some(Humor::Dry)));

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert_eq!(
        result.positives,
        vec![
            "Shared values: Family".to_string(),
            "Matching energy levels (chill)".to_string(),
        ]
    );
    assert!(result.frictions.is_empty());
    assert_eq!(result.unknowns.len(), 3);
    assert_eq!(result.shared_values, vec!["Family".to_string()]);
    assert_eq!(result.score, 70);
    assert_eq!(result.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_score_clamps_at_zero() {
    let requester = Profile::new("r").with_dealbreakers(["smoking", "drama", "debt", "lying"]);
    let candidate = Profile::new("c").with_values(["Smoking", "Drama", "Debt", "Lying"]);

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert_eq!(result.frictions.len(), 4);
    assert_eq!(result.score, 0);
    assert_eq!(result.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_score_clamps_at_hundred() {
    let config = ScoringConfig {
        positive_weight: 30,
        ..ScoringConfig::default()
    };
    let everything = PersonalityTags {
        humor: Some(Humor::Playful),
        energy: Some(Energy::High),
        planning: Some(Planning::Planned),
        conflict: Some(ConflictStyle::Collaborative),
    };
    let a = Profile::new("a").with_values(["Music"]).with_tags(everything);
    let b = Profile::new("b").with_values(["music"]).with_tags(everything);

    let result = CompatibilityAnalyzer::with_config(config).analyze(&a, &b);

    assert_eq!(result.positives.len(), 5);
    assert_eq!(result.score, 100);
}

fn self_profile(conflict: ConflictStyle) -> Profile {
    Profile::new("p")
        .with_values(["Honesty", "Travel"])
        .with_dealbreakers(["Cruelty"])
        .with_tags(PersonalityTags {
            humor: Some(Humor::Sarcastic),
            energy: Some(Energy::Balanced),
            planning: Some(Planning::Spontaneous),
            conflict: Some(conflict),
        })
}

/// Avoidant meets avoidant: no conflict verdict either way
#[test]
fn test_self_comparison_never_below_base() {
    let profile = self_profile(ConflictStyle::Avoidant);

    let result = CompatibilityAnalyzer::new().analyze(&profile, &profile);

    assert_eq!(
        result.positives,
        vec![
            "Shared values: Honesty, Travel".to_string(),
            "Matching energy levels (balanced)".to_string(),
            "Matching humor style (sarcastic)".to_string(),
            "Matching planning style (spontaneous)".to_string(),
        ]
    );
    assert!(result.frictions.is_empty());
    assert_eq!(result.score, 90);
    assert_eq!(result.shared_values, vec!["Honesty".to_string(), "Travel".to_string()]);
}

#[test]
fn test_self_comparison_all_axes_positive() {
    for (conflict, verdict) in [
        (ConflictStyle::Collaborative, "Compatible conflict styles (both collaborative)"),
        (ConflictStyle::Direct, "Compatible conflict styles (direct with direct)"),
    ] {
        let profile = self_profile(conflict);

        let result = CompatibilityAnalyzer::new().analyze(&profile, &profile);

        assert_eq!(
            result.positives,
            vec![
                "Shared values: Honesty, Travel".to_string(),
                "Matching energy levels (balanced)".to_string(),
                "Matching humor style (sarcastic)".to_string(),
                "Matching planning style (spontaneous)".to_string(),
                verdict.to_string(),
            ]
        );
        assert!(result.frictions.is_empty());
        assert_eq!(result.score, 100);
    }
}

#[test]
fn test_analysis_is_repeatable() {
    let analyzer = CompatibilityAnalyzer::new();
    let a = Profile::new("a")
        .with_values(["Family", "kids"])
        .with_tags(tags(Some(Energy::Chill), Some(Humor::Dry)));
    let b = Profile::new("b")
        .with_values(["family"])
        .with_tags(tags(Some(Energy::High), Some(Humor::Dry)));

    assert_eq!(analyzer.analyze(&a, &b), analyzer.analyze(&a, &b));
}

#[test]
fn test_two_unknowns_three_positives_is_medium() {
    let requester = Profile::new("r")
        .with_values(["Family", "kids"])
        .with_tags(tags(Some(Energy::Chill), Some(Humor::Dry)));
    let candidate = Profile::new("c")
        .with_values(["Family"])
        .with_tags(tags(Some(Energy::Chill), Some(Humor::Dry)));

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert_eq!(result.positives.len(), 3);
    assert_eq!(result.unknowns.len(), 2);
    assert_eq!(result.confidence, ConfidenceLevel::Medium);
}

#[test]
fn test_covered_catalog_three_positives_is_high() {
    let values = ["kids", "religion", "living"];
    let requester = Profile::new("r")
        .with_values(values)
        .with_tags(tags(Some(Energy::Balanced), Some(Humor::Silly)));
    let candidate = Profile::new("c")
        .with_values(values)
        .with_tags(tags(Some(Energy::Balanced), Some(Humor::Silly)));

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert!(result.unknowns.is_empty());
    assert_eq!(result.positives.len(), 3);
    assert_eq!(result.score, 80);
    assert_eq!(result.confidence, ConfidenceLevel::High);
}

#[test]
fn test_three_frictions_no_unknowns_is_low() {
    let requester = Profile::new("r")
        .with_values(["kids", "religion", "living"])
        .with_dealbreakers(["smoking", "gambling", "debt"]);
    let candidate = Profile::new("c").with_values(["Smoking", "Gambling", "Debt"]);

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert!(result.unknowns.is_empty());
    assert_eq!(result.frictions.len(), 3);
    assert_eq!(result.score, 5);
    assert_eq!(result.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_confidence_tier_precedence() {
    let analyzer = CompatibilityAnalyzer::new();

    // HIGH wins even with enough frictions for LOW
    assert_eq!(analyzer.confidence(3, 3, 0), ConfidenceLevel::High);
    assert_eq!(analyzer.confidence(3, 0, 1), ConfidenceLevel::High);
    assert_eq!(analyzer.confidence(2, 3, 0), ConfidenceLevel::Low);
    assert_eq!(analyzer.confidence(5, 0, 3), ConfidenceLevel::Low);
    assert_eq!(analyzer.confidence(2, 2, 2), ConfidenceLevel::Medium);
}

#[test]
fn test_dealbreakers_are_directional() {
    let p = Profile::new("p").with_dealbreakers(["smoking"]);
    let q = Profile::new("q").with_values(["smoking culture"]);
    let analyzer = CompatibilityAnalyzer::new();

    let forward = analyzer.analyze(&p, &q);
    let backward = analyzer.analyze(&q, &p);

    assert_eq!(forward.frictions.len(), 1);
    assert!(forward.frictions[0].contains("smoking"));
    assert!(backward.frictions.is_empty());
}

#[test]
fn test_opposite_energy_and_conflict_frictions() {
    let requester = Profile::new("r").with_tags(PersonalityTags {
        energy: Some(Energy::Chill),
        conflict: Some(ConflictStyle::Direct),
        planning: Some(Planning::Planned),
        ..Default::default()
    });
    let candidate = Profile::new("c").with_tags(PersonalityTags {
        energy: Some(Energy::High),
        conflict: Some(ConflictStyle::Avoidant),
        planning: Some(Planning::Spontaneous),
        ..Default::default()
    });

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);

    assert_eq!(
        result.frictions,
        vec![
            "Energy mismatch (chill vs high)".to_string(),
            "Planning style mismatch (planned vs spontaneous)".to_string(),
            "Conflict style mismatch: direct vs avoidant".to_string(),
        ]
    );
    assert_eq!(result.score, 5);
}

#[test]
fn test_unrecognized_axis_values_are_ignored() {
    let requester: Profile = serde_json::from_str(
        r#"{"id": "r", "personality_tags": {"energy": "hyperactive", "humor": "DRY"}}"#,
    )
    .unwrap();
    let candidate: Profile = serde_json::from_str(
        r#"{"id": "c", "personality_tags": {"energy": "hyperactive", "humor": "dry"}}"#,
    )
    .unwrap();

    assert_eq!(requester.personality_tags.energy, None);

    let result = CompatibilityAnalyzer::new().analyze(&requester, &candidate);
    assert_eq!(result.positives, vec!["Matching humor style (dry)".to_string()]);
}
