//! Complexity analysis results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How complex a task looks, ordered from simplest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        };
        write!(f, "{s}")
    }
}

/// Raw lexical signals extracted from a task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityFactors {
    /// Distinct recognized action verbs.
    pub verb_count: usize,
    /// Distinct file references.
    pub file_count: usize,
    /// Concept matches summed across patterns.
    pub concept_count: usize,
    /// Task text contains a step-separator phrase.
    pub has_multiple_steps: bool,
    /// Task text contains a dependency phrase.
    pub has_dependencies: bool,
    /// Estimated effort in minutes, clamped to the lexicon's bounds.
    pub estimated_minutes: u64,
}

/// Outcome of analyzing one task description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub level: ComplexityLevel,
    /// Weighted score in `0..=100`.
    pub score: u8,
    pub factors: ComplexityFactors,
    /// Human-readable notes on what drove the score.
    pub recommendations: Vec<String>,
}

impl ComplexityAnalysis {
    /// Estimated duration in milliseconds.
    pub fn estimated_duration_ms(&self) -> u64 {
        self.factors.estimated_minutes * 60_000
    }
}
