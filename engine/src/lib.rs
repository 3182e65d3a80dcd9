//! Review engine for pairdeck: state machine and orchestration.
//!
//! This crate contains the review flow without TUI dependencies. The
//! [`ReviewMachine`] is a pure reducer; [`App`] wraps it with a backend,
//! a timer wheel and a channel for background task results.

mod app;
mod dispatch;
mod gesture;
mod queue;
mod reason;
mod session;
mod summary;
mod timers;

pub use app::{App, AppSettings, CropStatus, SyncStats};
pub use gesture::{
    CardMotion, CardPose, DEGREES_PER_PIXEL, DragState, ExitKind, MAX_ROTATION_DEG, Release,
    SWIPE_THRESHOLD, classify_release,
};
pub use queue::{FilterCounts, apply_filter, fetch};
pub use reason::{ReasonInput, ReasonOutcome, ReasonPicker};
pub use session::{
    EXIT_DURATION, Effect, Event, Intent, ReviewMachine, SKIP_FADE_DURATION, SNAP_BACK_DURATION,
    Screen, SessionState, TimerKind, UNDO_HIDE_AFTER,
};
pub use summary::{ARC_CIRCUMFERENCE, Summary, skipped_subset};
pub use timers::TimerWheel;

pub use pairdeck_types::ui::{HitMap, Region, UiOptions};
