use crate::{Action, CandidateId};

/// One recorded decision. `index` is the cursor position it was made at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub candidate_id: CandidateId,
    pub action: Action,
    pub reason: Option<String>,
    pub index: usize,
}

/// Running decision counts for the current sub-session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub confirmed: usize,
    pub rejected: usize,
    pub skipped: usize,
}

impl Counters {
    pub fn record(&mut self, action: Action) {
        *self.slot(action) += 1;
    }

    pub fn revert(&mut self, action: Action) {
        let slot = self.slot(action);
        *slot = slot.saturating_sub(1);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.confirmed + self.rejected + self.skipped
    }

    #[must_use]
    pub fn reviewed(&self) -> usize {
        self.confirmed + self.rejected
    }

    fn slot(&mut self, action: Action) -> &mut usize {
        match action {
            Action::Confirmed => &mut self.confirmed,
            Action::Rejected => &mut self.rejected,
            Action::Skipped => &mut self.skipped,
        }
    }
}
