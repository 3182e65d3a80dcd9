//! Review session state machine.
//!
//! # State Machine
//! ```text
//!            start (queue non-empty)          cursor == len
//! ┌───────┐ ───────────────────────> ┌────────┐ ──────────────> ┌─────────┐
//! │ Queue │                          │ Review │                 │ Summary │
//! └───────┘ <───────────────────┐    └────────┘ <────────────── └─────────┘
//!                               │         ^        undo / review skipped │
//!                               └─────────┼──────────────────────────────┘
//!                                  back   │ reason modal (sub-state)
//! ```
//!
//! [`ReviewMachine::update`] is the only entry point. It is synchronous and
//! returns the [`Effect`]s the owner must carry out (network calls, timers,
//! config writes). Results of those effects never feed back into control flow
//! except through [`Event::QueueLoaded`] and [`Event::Timeout`].

use std::time::Duration;

use pairdeck_types::{
    CandidateId, ConfidenceFilter, Counters, Decision, HistoryEntry, MatchCandidate, Verdict,
};

use crate::gesture::{CardMotion, DragState, Release, classify_release};
use crate::queue::{FilterCounts, apply_filter};
use crate::reason::{ReasonInput, ReasonOutcome, ReasonPicker};
use crate::summary::{Summary, skipped_subset};

pub const EXIT_DURATION: Duration = Duration::from_millis(400);
pub const SKIP_FADE_DURATION: Duration = Duration::from_millis(300);
pub const SNAP_BACK_DURATION: Duration = Duration::from_millis(300);
pub const UNDO_HIDE_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Queue,
    Review,
    Summary,
}

/// Decision requested by a button, key, or swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Confirm,
    /// Opens reason capture; never finalizes on its own.
    Reject,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Exit animation finished; move the cursor.
    Advance,
    SnapBack,
    UndoHide,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    QueueLoaded(Vec<MatchCandidate>),
    Reload,
    SelectFilter(ConfidenceFilter),
    Start,
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    PointerUp { x: f32 },
    Decide(Intent),
    Undo,
    Reason(ReasonInput),
    Escape,
    Back,
    ReviewSkipped,
    Timeout { timer: TimerKind, generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fire-and-forget mutation. The outcome is only logged.
    SubmitDecision {
        candidate_id: CandidateId,
        verdict: Verdict,
    },
    Schedule {
        timer: TimerKind,
        generation: u64,
        after: Duration,
    },
    Cancel(TimerKind),
    Prefetch(CandidateId),
    ReloadQueue,
    PersistFilter(ConfidenceFilter),
}

/// Per-sub-session state. Replaced wholesale whenever a sub-session begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub(crate) current_index: usize,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) counters: Counters,
    pub(crate) animating: bool,
    pub(crate) motion: CardMotion,
}

impl SessionState {
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.counters
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    #[must_use]
    pub fn motion(&self) -> CardMotion {
        self.motion
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Generations {
    pub(crate) advance: u64,
    pub(crate) snap_back: u64,
    pub(crate) undo_hide: u64,
}

impl Generations {
    pub(crate) fn slot(&mut self, timer: TimerKind) -> &mut u64 {
        match timer {
            TimerKind::Advance => &mut self.advance,
            TimerKind::SnapBack => &mut self.snap_back,
            TimerKind::UndoHide => &mut self.undo_hide,
        }
    }

    pub(crate) fn current(&self, timer: TimerKind) -> u64 {
        match timer {
            TimerKind::Advance => self.advance,
            TimerKind::SnapBack => self.snap_back,
            TimerKind::UndoHide => self.undo_hide,
        }
    }
}

/// The reducer. Owns everything the review flow mutates.
#[derive(Debug, Clone, Default)]
pub struct ReviewMachine {
    source: Vec<MatchCandidate>,
    filter: ConfidenceFilter,
    loading: bool,
    pub(crate) queue: Vec<MatchCandidate>,
    screen: Screen,
    pub(crate) session: SessionState,
    pub(crate) reason: Option<ReasonPicker>,
    pub(crate) undo_visible: bool,
    pub(crate) generations: Generations,
}

impl ReviewMachine {
    #[must_use]
    pub fn new(filter: ConfidenceFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn filter(&self) -> ConfidenceFilter {
        self.filter
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn queue(&self) -> &[MatchCandidate] {
        &self.queue
    }

    #[must_use]
    pub fn source(&self) -> &[MatchCandidate] {
        &self.source
    }

    #[must_use]
    pub fn filter_counts(&self) -> FilterCounts {
        FilterCounts::tally(&self.source)
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn reason(&self) -> Option<&ReasonPicker> {
        self.reason.as_ref()
    }

    #[must_use]
    pub fn undo_visible(&self) -> bool {
        self.undo_visible
    }

    /// Whether "start" is enabled.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.screen == Screen::Queue && !self.loading && !self.queue.is_empty()
    }

    /// Candidate under the cursor while reviewing.
    #[must_use]
    pub fn current(&self) -> Option<&MatchCandidate> {
        if self.screen == Screen::Review {
            self.queue.get(self.session.current_index)
        } else {
            None
        }
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_counters(&self.session.counters)
    }

    // ========================================================================
    // Reducer
    // ========================================================================

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.reason.is_some() {
            match event {
                Event::Reason(input) => self.reason_input(input, &mut effects),
                Event::Escape => self.reason_input(ReasonInput::Dismiss, &mut effects),
                Event::Timeout { timer, generation } => {
                    self.timeout(timer, generation, &mut effects);
                }
                Event::QueueLoaded(candidates) => self.queue_loaded(candidates),
                _ => {}
            }
            return effects;
        }

        match event {
            Event::QueueLoaded(candidates) => self.queue_loaded(candidates),
            Event::Reload => self.reload(&mut effects),
            Event::SelectFilter(filter) => self.select_filter(filter, &mut effects),
            Event::Start => self.start(&mut effects),
            Event::PointerDown { x } => self.pointer_down(x, &mut effects),
            Event::PointerMove { x } => self.pointer_move(x),
            Event::PointerUp { x } => self.pointer_up(x, &mut effects),
            Event::Decide(Intent::Confirm) => {
                self.apply(Decision::Confirm, 0.0, &mut effects);
            }
            Event::Decide(Intent::Reject) => self.open_reason(0.0),
            Event::Decide(Intent::Skip) => {
                self.apply(Decision::Skip, 0.0, &mut effects);
            }
            Event::Undo => self.undo(&mut effects),
            Event::Timeout { timer, generation } => self.timeout(timer, generation, &mut effects),
            Event::Back => self.back(&mut effects),
            Event::ReviewSkipped => self.review_skipped(&mut effects),
            Event::Reason(_) | Event::Escape => {}
        }
        effects
    }

    // ========================================================================
    // Queue screen
    // ========================================================================

    fn queue_loaded(&mut self, candidates: Vec<MatchCandidate>) {
        tracing::debug!(count = candidates.len(), "Queue loaded");
        self.source = candidates;
        self.loading = false;
        if self.screen == Screen::Queue {
            self.queue = apply_filter(&self.source, self.filter);
        }
    }

    fn reload(&mut self, effects: &mut Vec<Effect>) {
        if self.screen != Screen::Queue || self.loading {
            return;
        }
        self.loading = true;
        effects.push(Effect::ReloadQueue);
    }

    fn select_filter(&mut self, filter: ConfidenceFilter, effects: &mut Vec<Effect>) {
        if self.screen != Screen::Queue || filter == self.filter {
            return;
        }
        self.filter = filter;
        self.queue = apply_filter(&self.source, filter);
        effects.push(Effect::PersistFilter(filter));
    }

    fn start(&mut self, effects: &mut Vec<Effect>) {
        if !self.can_start() {
            return;
        }
        self.begin_sub_session(effects);
    }

    /// Fresh cursor, history and counters over the current queue.
    fn begin_sub_session(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_pending(effects);
        self.session = SessionState::default();
        self.reason = None;
        self.screen = Screen::Review;
        for candidate in self.queue.iter().take(2) {
            effects.push(Effect::Prefetch(candidate.id.clone()));
        }
        tracing::info!(queue_len = self.queue.len(), "Review session started");
    }

    // ========================================================================
    // Summary screen
    // ========================================================================

    fn back(&mut self, effects: &mut Vec<Effect>) {
        if self.screen != Screen::Summary {
            return;
        }
        self.cancel_pending(effects);
        self.session = SessionState::default();
        self.screen = Screen::Queue;
        self.queue = apply_filter(&self.source, self.filter);
        self.loading = true;
        effects.push(Effect::ReloadQueue);
    }

    pub(crate) fn enter_summary(&mut self) {
        self.screen = Screen::Summary;
        let summary = self.summary();
        tracing::info!(
            confirmed = summary.confirmed,
            rejected = summary.rejected,
            skipped = summary.skipped,
            "Review queue exhausted"
        );
    }

    pub(crate) fn resume_review(&mut self) {
        self.screen = Screen::Review;
    }

    fn review_skipped(&mut self, effects: &mut Vec<Effect>) {
        if self.screen != Screen::Summary {
            return;
        }
        let subset = skipped_subset(&self.queue, &self.session.history);
        if subset.is_empty() {
            return;
        }
        self.queue = subset;
        self.begin_sub_session(effects);
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    fn accepts_decisions(&self) -> bool {
        self.screen == Screen::Review
            && !self.session.animating
            && self.session.current_index < self.queue.len()
    }

    fn pointer_down(&mut self, x: f32, effects: &mut Vec<Effect>) {
        if !self.accepts_decisions() {
            return;
        }
        if matches!(self.session.motion, CardMotion::SnappingBack { .. }) {
            self.cancel_timer(TimerKind::SnapBack, effects);
        }
        self.session.motion = CardMotion::Dragging(DragState::new(x));
    }

    fn pointer_move(&mut self, x: f32) {
        if let CardMotion::Dragging(drag) = &mut self.session.motion {
            drag.update(x);
        }
    }

    fn pointer_up(&mut self, x: f32, effects: &mut Vec<Effect>) {
        let CardMotion::Dragging(mut drag) = self.session.motion else {
            return;
        };
        drag.update(x);
        let dx = drag.dx();
        match classify_release(dx) {
            Release::Confirm => self.apply(Decision::Confirm, dx, effects),
            Release::OpenReject => self.open_reason(dx),
            Release::SnapBack => self.snap_back(dx, effects),
        }
    }

    fn snap_back(&mut self, dx: f32, effects: &mut Vec<Effect>) {
        if dx.abs() < f32::EPSILON {
            self.session.motion = CardMotion::Neutral;
            return;
        }
        self.session.motion = CardMotion::SnappingBack { from_dx: dx };
        self.schedule(TimerKind::SnapBack, SNAP_BACK_DURATION, effects);
    }

    // ========================================================================
    // Reason modal
    // ========================================================================

    fn open_reason(&mut self, dx: f32) {
        if !self.accepts_decisions() {
            return;
        }
        let Some(candidate) = self.queue.get(self.session.current_index) else {
            return;
        };
        self.reason = Some(ReasonPicker::new(candidate.id.clone()));
        self.session.motion = CardMotion::AwaitingReason { dx };
    }

    fn reason_input(&mut self, input: ReasonInput, effects: &mut Vec<Effect>) {
        let Some(picker) = self.reason.as_mut() else {
            return;
        };
        match picker.handle(input) {
            ReasonOutcome::Pending => {}
            ReasonOutcome::Finalize(reason) => {
                self.reason = None;
                let dx = self.session.motion.offset();
                self.apply(Decision::Reject(reason), dx, effects);
            }
            ReasonOutcome::Abandon => {
                self.reason = None;
                let dx = self.session.motion.offset();
                self.snap_back(dx, effects);
            }
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Bump the generation for `timer` and ask the owner to arm it.
    pub(crate) fn schedule(&mut self, timer: TimerKind, after: Duration, effects: &mut Vec<Effect>) {
        let slot = self.generations.slot(timer);
        *slot += 1;
        effects.push(Effect::Schedule {
            timer,
            generation: *slot,
            after,
        });
    }

    /// Invalidate any outstanding `timer` so a late delivery is ignored.
    pub(crate) fn cancel_timer(&mut self, timer: TimerKind, effects: &mut Vec<Effect>) {
        *self.generations.slot(timer) += 1;
        effects.push(Effect::Cancel(timer));
    }

    fn cancel_pending(&mut self, effects: &mut Vec<Effect>) {
        for timer in [TimerKind::Advance, TimerKind::SnapBack, TimerKind::UndoHide] {
            self.cancel_timer(timer, effects);
        }
        self.undo_visible = false;
    }

    fn timeout(&mut self, timer: TimerKind, generation: u64, effects: &mut Vec<Effect>) {
        if generation != self.generations.current(timer) {
            tracing::trace!(?timer, generation, "Dropping stale timeout");
            return;
        }
        match timer {
            TimerKind::Advance => self.advance(effects),
            TimerKind::SnapBack => {
                if matches!(self.session.motion, CardMotion::SnappingBack { .. }) {
                    self.session.motion = CardMotion::Neutral;
                }
            }
            TimerKind::UndoHide => self.undo_visible = false,
        }
    }
}
