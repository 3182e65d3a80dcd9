use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a candidate pairing by the upstream matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Match confidence in `[0, 1]`.
///
/// Out-of-range values from the wire are clamped, and non-finite values
/// collapse to zero so they sort into the low-confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole-number percentage for display.
    #[must_use]
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

/// Which of the two observations in a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointSide {
    A,
    B,
}

impl EndpointSide {
    pub const BOTH: [Self; 2] = [Self::A, Self::B];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    #[serde(default)]
    pub score: Option<f32>,
}

/// One observation of the pairing: where and when it was seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub source_id: String,
    pub track_id: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub crop_ref: Option<String>,
}

impl Endpoint {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.label.as_str())
    }

    /// Time the track was visible. Zero if the window is inverted.
    #[must_use]
    pub fn dwell(&self) -> TimeDelta {
        (self.last_seen - self.first_seen).max(TimeDelta::zero())
    }
}

/// A proposed pairing of two observations, pending human review.
///
/// Read-only for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: CandidateId,
    pub endpoint_a: Endpoint,
    pub endpoint_b: Endpoint,
    pub confidence: Confidence,
    #[serde(default)]
    pub match_method: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
}

impl MatchCandidate {
    #[must_use]
    pub fn endpoint(&self, side: EndpointSide) -> &Endpoint {
        match side {
            EndpointSide::A => &self.endpoint_a,
            EndpointSide::B => &self.endpoint_b,
        }
    }

    /// Gap between the end of A and the start of B. Negative when they overlap.
    #[must_use]
    pub fn transit(&self) -> TimeDelta {
        self.endpoint_b.first_seen - self.endpoint_a.last_seen
    }
}
