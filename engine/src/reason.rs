//! Rejection reason capture.
//!
//! # State Machine
//! ```text
//! ┌──────────────┐ Choose / ChooseCursor ┌──────────────┐
//! │ Unarmed      │ ────────────────────> │ Armed(idx)   │
//! └──────────────┘                       └──────────────┘
//!    │      │                               │      │
//!    │      │ SkipReason                    │      │ Submit
//!    │      └─────────────┐   ┌─────────────┘      │
//!    │                    v   v                    │
//!    │             [Finalize(reason?)] <───────────┘
//!    │ Dismiss (Esc / backdrop)
//!    v
//! [Abandon]
//! ```

use pairdeck_types::{CandidateId, RejectReason};

const MAX_OTHER_CHARS: usize = 200;

/// Modal input, already translated from keys or clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonInput {
    CursorUp,
    CursorDown,
    /// Select option by index (presets first, then "other").
    Choose(usize),
    ChooseCursor,
    Type(char),
    Backspace,
    Submit,
    SkipReason,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonOutcome {
    Pending,
    Finalize(Option<String>),
    Abandon,
}

/// Open reason modal for one pending reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPicker {
    candidate_id: CandidateId,
    cursor: usize,
    selected: Option<usize>,
    other_text: String,
}

impl ReasonPicker {
    /// Presets plus the free-text "other" entry.
    pub const OPTION_COUNT: usize = RejectReason::PRESETS.len() + 1;
    const OTHER_INDEX: usize = RejectReason::PRESETS.len();

    #[must_use]
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            cursor: 0,
            selected: None,
            other_text: String::new(),
        }
    }

    #[must_use]
    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the confirm action is enabled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub fn is_other_selected(&self) -> bool {
        self.selected == Some(Self::OTHER_INDEX)
    }

    #[must_use]
    pub fn other_text(&self) -> &str {
        &self.other_text
    }

    #[must_use]
    pub fn option_label(index: usize) -> &'static str {
        RejectReason::PRESETS
            .get(index)
            .map_or("Other", RejectReason::label)
    }

    #[must_use]
    pub fn selected_reason(&self) -> Option<RejectReason> {
        let index = self.selected?;
        Some(
            RejectReason::PRESETS
                .get(index)
                .cloned()
                .unwrap_or_else(|| RejectReason::Other(self.other_text.clone())),
        )
    }

    pub fn handle(&mut self, input: ReasonInput) -> ReasonOutcome {
        match input {
            ReasonInput::CursorUp => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(Self::OPTION_COUNT - 1);
            }
            ReasonInput::CursorDown => {
                self.cursor = (self.cursor + 1) % Self::OPTION_COUNT;
            }
            ReasonInput::Choose(index) if index < Self::OPTION_COUNT => {
                self.cursor = index;
                self.selected = Some(index);
            }
            ReasonInput::Choose(_) => {}
            ReasonInput::ChooseCursor => {
                self.selected = Some(self.cursor);
            }
            ReasonInput::Type(ch) => {
                if self.is_other_selected()
                    && !ch.is_control()
                    && self.other_text.chars().count() < MAX_OTHER_CHARS
                {
                    self.other_text.push(ch);
                }
            }
            ReasonInput::Backspace => {
                if self.is_other_selected() {
                    self.other_text.pop();
                }
            }
            ReasonInput::Submit => {
                if let Some(reason) = self.selected_reason() {
                    return ReasonOutcome::Finalize(Some(reason.tag()));
                }
            }
            ReasonInput::SkipReason => return ReasonOutcome::Finalize(None),
            ReasonInput::Dismiss => return ReasonOutcome::Abandon,
        }
        ReasonOutcome::Pending
    }
}
