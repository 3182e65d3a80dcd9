use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Confidence, MatchCandidate};

/// Candidates at or above this confidence count as "high".
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Confidence predicate applied to the loaded candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceFilter {
    #[default]
    All,
    High,
    Low,
}

#[derive(Debug, Error)]
#[error("unknown confidence filter `{0}` (expected all, high or low)")]
pub struct ParseFilterError(String);

impl ConfidenceFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::High, Self::Low];

    #[must_use]
    pub fn matches(self, confidence: Confidence) -> bool {
        match self {
            Self::All => true,
            Self::High => confidence.value() >= HIGH_CONFIDENCE_THRESHOLD,
            Self::Low => confidence.value() < HIGH_CONFIDENCE_THRESHOLD,
        }
    }

    #[must_use]
    pub fn admits(self, candidate: &MatchCandidate) -> bool {
        self.matches(candidate.confidence)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::High => "high",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::High => "High ≥ 70%",
            Self::Low => "Low < 70%",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::High,
            Self::High => Self::Low,
            Self::Low => Self::All,
        }
    }
}

impl fmt::Display for ConfidenceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Restricts which candidates the collaborator returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    pub source_id: Option<String>,
    pub entity_type: Option<String>,
    pub limit: Option<usize>,
}

impl SourceFilter {
    /// Query pairs for the fetch request, skipping unset fields.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(source) = &self.source_id {
            pairs.push(("source_id", source.clone()));
        }
        if let Some(entity) = &self.entity_type {
            pairs.push(("entity_type", entity.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
