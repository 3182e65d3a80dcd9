//! Decision dispatch: the single mutation point for history and counters.

use pairdeck_types::{Decision, HistoryEntry};

use crate::gesture::{CardMotion, ExitKind};
use crate::session::{
    EXIT_DURATION, Effect, ReviewMachine, SKIP_FADE_DURATION, Screen, TimerKind, UNDO_HIDE_AFTER,
};

impl ReviewMachine {
    /// Record `decision` for the card under the cursor and start its exit.
    ///
    /// Silently ignored while another decision is animating or the cursor is
    /// past the end of the queue.
    pub(crate) fn apply(&mut self, decision: Decision, from_dx: f32, effects: &mut Vec<Effect>) {
        if self.screen() != Screen::Review || self.session.animating {
            return;
        }
        let index = self.session.current_index;
        let Some(candidate) = self.queue.get(index) else {
            return;
        };
        let candidate_id = candidate.id.clone();
        let action = decision.action();

        self.session.history.push(HistoryEntry {
            candidate_id: candidate_id.clone(),
            action,
            reason: decision.reason().map(str::to_string),
            index,
        });
        self.session.counters.record(action);
        self.session.animating = true;

        let (kind, duration) = match decision {
            Decision::Confirm => (ExitKind::SwipeRight, EXIT_DURATION),
            Decision::Reject(_) => (ExitKind::SwipeLeft, EXIT_DURATION),
            Decision::Skip => (ExitKind::Fade, SKIP_FADE_DURATION),
        };
        self.session.motion = CardMotion::Exiting { kind, from_dx };

        tracing::info!(
            candidate = %candidate_id,
            action = action.as_str(),
            reason = decision.reason(),
            index,
            "Decision applied"
        );

        if let Some(verdict) = decision.verdict() {
            effects.push(Effect::SubmitDecision {
                candidate_id,
                verdict,
            });
        }
        self.cancel_timer(TimerKind::SnapBack, effects);
        self.schedule(TimerKind::Advance, duration, effects);
        self.undo_visible = true;
        self.schedule(TimerKind::UndoHide, UNDO_HIDE_AFTER, effects);
    }

    /// Exit animation finished: move past the decided card.
    pub(crate) fn advance(&mut self, effects: &mut Vec<Effect>) {
        if !self.session.animating {
            return;
        }
        self.session.animating = false;
        self.session.motion = CardMotion::Neutral;
        self.session.current_index = (self.session.current_index + 1).min(self.queue.len());

        if self.session.current_index == self.queue.len() {
            self.enter_summary();
        } else if let Some(next) = self.queue.get(self.session.current_index + 1) {
            effects.push(Effect::Prefetch(next.id.clone()));
        }
    }

    /// Local-only reversal of the most recent decision.
    pub(crate) fn undo(&mut self, effects: &mut Vec<Effect>) {
        if !matches!(self.screen(), Screen::Review | Screen::Summary) {
            return;
        }
        let Some(entry) = self.session.history.pop() else {
            return;
        };
        if self.session.animating {
            self.cancel_timer(TimerKind::Advance, effects);
            self.session.animating = false;
        }
        self.session.current_index = entry.index;
        self.session.counters.revert(entry.action);
        self.session.motion = CardMotion::Neutral;
        if self.undo_visible {
            self.undo_visible = false;
            self.cancel_timer(TimerKind::UndoHide, effects);
        }
        if self.screen() == Screen::Summary {
            self.resume_review();
        }
        tracing::info!(
            candidate = %entry.candidate_id,
            action = entry.action.as_str(),
            index = entry.index,
            "Decision undone locally"
        );
    }
}
