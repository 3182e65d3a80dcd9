//! Completion statistics for the summary screen.

use std::collections::HashMap;
use std::f32::consts::PI;

use pairdeck_types::{Action, CandidateId, Counters, HistoryEntry, MatchCandidate};

/// Circumference of the completion arc (radius 54).
pub const ARC_CIRCUMFERENCE: f32 = 2.0 * PI * 54.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub confirmed: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub total: usize,
    pub reviewed: usize,
    /// `reviewed / total`, zero when nothing was decided.
    pub completion: f32,
}

impl Summary {
    #[must_use]
    pub fn from_counters(counters: &Counters) -> Self {
        let total = counters.total();
        let reviewed = counters.reviewed();
        let completion = if total == 0 {
            0.0
        } else {
            reviewed as f32 / total as f32
        };
        Self {
            confirmed: counters.confirmed,
            rejected: counters.rejected,
            skipped: counters.skipped,
            total,
            reviewed,
            completion,
        }
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        (self.completion * 100.0).round() as u8
    }

    /// Unfilled length of the completion arc.
    #[must_use]
    pub fn arc_offset(&self) -> f32 {
        ARC_CIRCUMFERENCE * (1.0 - self.completion)
    }
}

/// Candidates whose last recorded action was a skip, in queue order.
#[must_use]
pub fn skipped_subset(queue: &[MatchCandidate], history: &[HistoryEntry]) -> Vec<MatchCandidate> {
    let mut last: HashMap<&CandidateId, Action> = HashMap::new();
    for entry in history {
        last.insert(&entry.candidate_id, entry.action);
    }
    queue
        .iter()
        .filter(|candidate| last.get(&candidate.id) == Some(&Action::Skipped))
        .cloned()
        .collect()
}
