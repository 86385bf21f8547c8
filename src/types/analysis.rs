//! Analyzer output types

use serde::{Deserialize, Serialize};

/// Coarse reliability tier for a computed match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::Low => "LOW",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open question neither profile answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unknown {
    pub question: String,
    pub reason: String,
}

impl Unknown {
    pub fn new(question: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            reason: reason.into(),
        }
    }
}

/// Result of comparing two profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Supporting evidence
    pub positives: Vec<String>,
    /// Opposing evidence
    pub frictions: Vec<String>,
    pub unknowns: Vec<Unknown>,
    /// Case-insensitive intersection of both value lists, requester spelling
    pub shared_values: Vec<String>,
    /// Always within [0, 100]
    pub score: u8,
    pub confidence: ConfidenceLevel,
}
