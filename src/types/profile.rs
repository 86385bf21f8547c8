//! Profile types: what the system knows about a user or seed persona
//!
//! Personality axes are fixed fields, each optional (absent = unknown).
//! Unrecognized axis values deserialize as unknown instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Axis value that did not match any known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {axis} value: {value:?}")]
pub struct UnknownAxisValue {
    pub axis: &'static str,
    pub value: String,
}

impl UnknownAxisValue {
    fn new(axis: &'static str, value: &str) -> Self {
        Self { axis, value: value.to_string() }
    }
}

/// Humor style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Humor {
    Dry,
    Playful,
    Silly,
    Sarcastic,
}

impl Humor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Humor::Dry => "dry",
            Humor::Playful => "playful",
            Humor::Silly => "silly",
            Humor::Sarcastic => "sarcastic",
        }
    }
}

impl FromStr for Humor {
    type Err = UnknownAxisValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dry" => Ok(Humor::Dry),
            "playful" => Ok(Humor::Playful),
            "silly" => Ok(Humor::Silly),
            "sarcastic" => Ok(Humor::Sarcastic),
            _ => Err(UnknownAxisValue::new("humor", s)),
        }
    }
}

/// Social energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Chill,
    Balanced,
    High,
}

impl Energy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Energy::Chill => "chill",
            Energy::Balanced => "balanced",
            Energy::High => "high",
        }
    }
}

impl FromStr for Energy {
    type Err = UnknownAxisValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chill" => Ok(Energy::Chill),
            "balanced" => Ok(Energy::Balanced),
            "high" => Ok(Energy::High),
            _ => Err(UnknownAxisValue::new("energy", s)),
        }
    }
}

/// Planning preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planning {
    Spontaneous,
    Planned,
}

impl Planning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Planning::Spontaneous => "spontaneous",
            Planning::Planned => "planned",
        }
    }
}

impl FromStr for Planning {
    type Err = UnknownAxisValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spontaneous" => Ok(Planning::Spontaneous),
            "planned" => Ok(Planning::Planned),
            _ => Err(UnknownAxisValue::new("planning", s)),
        }
    }
}

/// How someone handles disagreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStyle {
    Direct,
    Avoidant,
    Collaborative,
}

impl ConflictStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStyle::Direct => "direct",
            ConflictStyle::Avoidant => "avoidant",
            ConflictStyle::Collaborative => "collaborative",
        }
    }
}

impl FromStr for ConflictStyle {
    type Err = UnknownAxisValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(ConflictStyle::Direct),
            "avoidant" => Ok(ConflictStyle::Avoidant),
            "collaborative" => Ok(ConflictStyle::Collaborative),
            _ => Err(UnknownAxisValue::new("conflict", s)),
        }
    }
}

macro_rules! impl_axis_display {
    ($($axis:ty),*) => {
        $(
            impl std::fmt::Display for $axis {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_axis_display!(Humor, Energy, Planning, ConflictStyle);

/// Personality axes, each optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityTags {
    #[serde(default, deserialize_with = "lenient_axis", skip_serializing_if = "Option::is_none")]
    pub humor: Option<Humor>,
    #[serde(default, deserialize_with = "lenient_axis", skip_serializing_if = "Option::is_none")]
    pub energy: Option<Energy>,
    #[serde(default, deserialize_with = "lenient_axis", skip_serializing_if = "Option::is_none")]
    pub planning: Option<Planning>,
    #[serde(default, deserialize_with = "lenient_axis", skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictStyle>,
}

impl PersonalityTags {
    /// True when no axis is known
    pub fn is_empty(&self) -> bool {
        self.humor.is_none() && self.energy.is_none() && self.planning.is_none() && self.conflict.is_none()
    }
}

/// Accept any JSON shape for an axis; only a recognized string yields a value
fn lenient_axis<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

/// An inferred claim awaiting yes/no confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub claim: String,
    pub question: String,
    /// None = pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

impl Hypothesis {
    pub fn new(claim: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            question: question.into(),
            confirmed: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.confirmed.is_none()
    }
}

/// A topic the system knows it lacks data on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGap {
    pub question: String,
    pub reason: String,
}

/// Structured personality/preference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub dealbreakers: Vec<String>,
    #[serde(default)]
    pub personality_tags: PersonalityTags,
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
    #[serde(default)]
    pub knowledge_gaps: Vec<KnowledgeGap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Synthetic persona usable as a match candidate
    #[serde(default)]
    pub is_seed: bool,
}

impl Profile {
    /// Empty profile for a real user
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Vec::new(),
            dealbreakers: Vec::new(),
            personality_tags: PersonalityTags::default(),
            hypotheses: Vec::new(),
            knowledge_gaps: Vec::new(),
            display_name: None,
            photo_url: None,
            is_seed: false,
        }
    }

    /// Empty seed persona
    pub fn seed(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            is_seed: true,
            ..Self::new(id)
        }
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dealbreakers<I, S>(mut self, dealbreakers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dealbreakers = dealbreakers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags(mut self, tags: PersonalityTags) -> Self {
        self.personality_tags = tags;
        self
    }

    /// Name shown to the other side of a match
    pub fn display_name_or_anonymous(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Partial profile data extracted from a conversation or photo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileExtraction {
    pub values: Vec<String>,
    pub dealbreakers: Vec<String>,
    pub personality_tags: PersonalityTags,
    pub hypotheses: Vec<Hypothesis>,
    pub knowledge_gaps: Vec<KnowledgeGap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Kind of insight surfaced live during a voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    Value,
    Dealbreaker,
    Energy,
    Humor,
    Planning,
    Conflict,
}

/// A single live insight, e.g. `{ "type": "energy", "label": "Chill 😌" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceChip {
    #[serde(rename = "type")]
    pub kind: ChipKind,
    pub label: String,
}

impl IntelligenceChip {
    pub fn new(kind: ChipKind, label: impl Into<String>) -> Self {
        Self { kind, label: label.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_empty_until_any_axis_known() {
        let mut tags = PersonalityTags::default();
        assert!(tags.is_empty());

        tags.conflict = Some(ConflictStyle::Direct);
        assert!(!tags.is_empty());
    }

    #[test]
    fn test_axis_parse_is_case_insensitive() {
        assert_eq!("CHILL".parse::<Energy>(), Ok(Energy::Chill));
        assert!("loud".parse::<Energy>().is_err());
    }
}
