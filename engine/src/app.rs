//! Controller that owns a review machine and carries out its effects.
//!
//! Every trigger exposed to the shell (keys, buttons, mouse) funnels into
//! [`App::dispatch`], so a button press and its keyboard or gesture
//! equivalent produce the same transition.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use pairdeck_backend::ReviewBackend;
use pairdeck_config::{PairdeckConfig, persist_filter_at};
use pairdeck_types::ui::{EffectTimer, HitMap, UiOptions};
use pairdeck_types::{CandidateId, ConfidenceFilter, EndpointSide, MatchCandidate, SourceFilter};

use crate::gesture::{CardMotion, CardPose, ExitKind};
use crate::queue;
use crate::reason::ReasonInput;
use crate::session::{
    EXIT_DURATION, Effect, Event, Intent, ReviewMachine, SKIP_FADE_DURATION, SNAP_BACK_DURATION,
};
use crate::timers::TimerWheel;

/// Runtime settings resolved from config.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub filter: ConfidenceFilter,
    pub source: SourceFilter,
    pub ui: UiOptions,
    /// Horizontal pixels represented by one terminal column.
    pub pixels_per_column: f32,
    /// Where filter changes are written. `None` disables persistence.
    pub config_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from_config(None)
    }
}

impl AppSettings {
    #[must_use]
    pub fn from_config(config: Option<&PairdeckConfig>) -> Self {
        let defaults = PairdeckConfig::default();
        let config = config.unwrap_or(&defaults);
        Self {
            filter: config.confidence_filter(),
            source: config.source_filter(),
            ui: config.ui_options(),
            pixels_per_column: config.pixels_per_column(),
            config_path: PairdeckConfig::path(),
        }
    }
}

/// Outcome of a spawned background task.
#[derive(Debug)]
enum BackgroundResult {
    QueueLoaded(Vec<MatchCandidate>),
    MutationSettled {
        candidate_id: CandidateId,
        error: Option<String>,
    },
    CropSettled {
        candidate_id: CandidateId,
        side: EndpointSide,
        result: Result<usize, String>,
    },
}

/// Counters fed only by background task outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub submitted: usize,
    pub acknowledged: usize,
    pub failed: usize,
    pub prefetched: usize,
    pub prefetch_failed: usize,
}

impl SyncStats {
    /// Decisions sent but not yet settled.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.submitted
            .saturating_sub(self.acknowledged + self.failed)
    }
}

/// Prefetch state of one crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropStatus {
    Loading,
    Ready { bytes: usize },
    Unavailable,
}

pub struct App {
    machine: ReviewMachine,
    backend: Arc<dyn ReviewBackend>,
    settings: AppSettings,
    timers: TimerWheel,
    results_tx: mpsc::UnboundedSender<BackgroundResult>,
    results_rx: mpsc::UnboundedReceiver<BackgroundResult>,
    sync: SyncStats,
    crops: HashMap<(CandidateId, EndpointSide), CropStatus>,
    clock: Instant,
    motion: CardMotion,
    motion_timer: EffectTimer,
    hit_map: HitMap,
    ticks: usize,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(backend: Arc<dyn ReviewBackend>, settings: AppSettings) -> Self {
        Self::with_clock(backend, settings, Instant::now())
    }

    /// Build with an explicit start instant, for driving time by hand.
    #[must_use]
    pub fn with_clock(
        backend: Arc<dyn ReviewBackend>,
        settings: AppSettings,
        clock: Instant,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            machine: ReviewMachine::new(settings.filter),
            backend,
            settings,
            timers: TimerWheel::default(),
            results_tx,
            results_rx,
            sync: SyncStats::default(),
            crops: HashMap::new(),
            clock,
            motion: CardMotion::Neutral,
            motion_timer: EffectTimer::new(std::time::Duration::ZERO),
            hit_map: HitMap::default(),
            ticks: 0,
            should_quit: false,
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    #[must_use]
    pub fn machine(&self) -> &ReviewMachine {
        &self.machine
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.settings.ui
    }

    #[must_use]
    pub fn sync_stats(&self) -> SyncStats {
        self.sync
    }

    #[must_use]
    pub fn crop_status(&self, id: &CandidateId, side: EndpointSide) -> Option<CropStatus> {
        self.crops.get(&(id.clone(), side)).copied()
    }

    #[must_use]
    pub fn clock(&self) -> Instant {
        self.clock
    }

    /// Number of clock advances so far. Drives spinners.
    #[must_use]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Current card transform, including progress through any transition.
    #[must_use]
    pub fn card_pose(&self) -> CardPose {
        self.motion.pose(self.motion_timer.progress())
    }

    #[must_use]
    pub fn hit_map(&self) -> &HitMap {
        &self.hit_map
    }

    pub fn set_hit_map(&mut self, hit_map: HitMap) {
        self.hit_map = hit_map;
    }

    // ========================================================================
    // Named triggers
    // ========================================================================

    pub fn reload(&mut self) {
        self.dispatch(Event::Reload);
    }

    pub fn select_filter(&mut self, filter: ConfidenceFilter) {
        self.dispatch(Event::SelectFilter(filter));
    }

    pub fn cycle_filter(&mut self) {
        self.select_filter(self.machine.filter().next());
    }

    pub fn start_review(&mut self) {
        self.dispatch(Event::Start);
    }

    pub fn confirm(&mut self) {
        self.dispatch(Event::Decide(Intent::Confirm));
    }

    pub fn reject(&mut self) {
        self.dispatch(Event::Decide(Intent::Reject));
    }

    pub fn skip(&mut self) {
        self.dispatch(Event::Decide(Intent::Skip));
    }

    pub fn undo(&mut self) {
        self.dispatch(Event::Undo);
    }

    pub fn back(&mut self) {
        self.dispatch(Event::Back);
    }

    pub fn review_skipped(&mut self) {
        self.dispatch(Event::ReviewSkipped);
    }

    pub fn escape(&mut self) {
        self.dispatch(Event::Escape);
    }

    pub fn reason_input(&mut self, input: ReasonInput) {
        self.dispatch(Event::Reason(input));
    }

    /// Pointer positions are in device-independent pixels.
    pub fn pointer_down(&mut self, x: f32) {
        self.dispatch(Event::PointerDown { x });
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.dispatch(Event::PointerMove { x });
    }

    pub fn pointer_up(&mut self, x: f32) {
        self.dispatch(Event::PointerUp { x });
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Advance to the wall clock. Called once per frame.
    pub fn tick(&mut self) {
        self.advance_clock(Instant::now());
    }

    /// Drain finished background work, then deliver every timeout due at `now`.
    pub fn advance_clock(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.clock);
        self.clock = self.clock.max(now);
        self.motion_timer.advance(delta);
        self.ticks = self.ticks.wrapping_add(1);

        while let Ok(result) = self.results_rx.try_recv() {
            self.settle(result);
        }

        for (timer, generation) in self.timers.take_due(self.clock) {
            self.dispatch(Event::Timeout { timer, generation });
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    pub fn dispatch(&mut self, event: Event) {
        let effects = self.machine.update(event);
        self.track_motion();
        for effect in effects {
            self.execute(effect);
        }
    }

    fn track_motion(&mut self) {
        let motion = self.machine.session().motion();
        if motion == self.motion {
            return;
        }
        let duration = match motion {
            CardMotion::SnappingBack { .. } => SNAP_BACK_DURATION,
            CardMotion::Exiting {
                kind: ExitKind::Fade,
                ..
            } => SKIP_FADE_DURATION,
            CardMotion::Exiting { .. } => EXIT_DURATION,
            CardMotion::Neutral
            | CardMotion::Dragging(_)
            | CardMotion::AwaitingReason { .. } => std::time::Duration::ZERO,
        };
        // A moving drag keeps its timer; only a new phase restarts it.
        if std::mem::discriminant(&motion) != std::mem::discriminant(&self.motion) {
            self.motion_timer = EffectTimer::new(duration);
        }
        self.motion = motion;
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::SubmitDecision {
                candidate_id,
                verdict,
            } => {
                self.sync.submitted += 1;
                let request = self
                    .backend
                    .submit_decision(candidate_id.clone(), verdict);
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let error = request.await.err().map(|err| err.to_string());
                    let _ = tx.send(BackgroundResult::MutationSettled {
                        candidate_id,
                        error,
                    });
                });
            }
            Effect::Schedule {
                timer,
                generation,
                after,
            } => self.timers.arm_after(timer, generation, self.clock, after),
            Effect::Cancel(timer) => self.timers.disarm(timer),
            Effect::Prefetch(candidate_id) => self.prefetch(candidate_id),
            Effect::ReloadQueue => {
                let backend = Arc::clone(&self.backend);
                let source = self.settings.source.clone();
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let candidates = queue::fetch(backend.as_ref(), source).await;
                    let _ = tx.send(BackgroundResult::QueueLoaded(candidates));
                });
            }
            Effect::PersistFilter(filter) => {
                let Some(path) = self.settings.config_path.as_deref() else {
                    return;
                };
                if let Err(err) = persist_filter_at(path, filter) {
                    tracing::warn!(error = %err, path = %path.display(), "Failed to persist filter");
                }
            }
        }
    }

    fn prefetch(&mut self, candidate_id: CandidateId) {
        for side in EndpointSide::BOTH {
            let key = (candidate_id.clone(), side);
            if matches!(
                self.crops.get(&key),
                Some(CropStatus::Loading | CropStatus::Ready { .. })
            ) {
                continue;
            }
            self.crops.insert(key, CropStatus::Loading);
            let request = self.backend.fetch_crop(candidate_id.clone(), side);
            let tx = self.results_tx.clone();
            let candidate_id = candidate_id.clone();
            tokio::spawn(async move {
                let result = request
                    .await
                    .map(|bytes| bytes.len())
                    .map_err(|err| err.to_string());
                let _ = tx.send(BackgroundResult::CropSettled {
                    candidate_id,
                    side,
                    result,
                });
            });
        }
    }

    fn settle(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::QueueLoaded(candidates) => {
                // Crop status is keyed by candidate; a fresh source list starts clean.
                self.crops.clear();
                self.dispatch(Event::QueueLoaded(candidates));
            }
            BackgroundResult::MutationSettled {
                candidate_id,
                error: None,
            } => {
                self.sync.acknowledged += 1;
                tracing::debug!(candidate = %candidate_id, "Decision acknowledged");
            }
            BackgroundResult::MutationSettled {
                candidate_id,
                error: Some(error),
            } => {
                self.sync.failed += 1;
                tracing::warn!(candidate = %candidate_id, %error, "Decision was not persisted");
            }
            BackgroundResult::CropSettled {
                candidate_id,
                side,
                result,
            } => {
                let status = match result {
                    Ok(bytes) => {
                        self.sync.prefetched += 1;
                        CropStatus::Ready { bytes }
                    }
                    Err(error) => {
                        self.sync.prefetch_failed += 1;
                        tracing::debug!(
                            candidate = %candidate_id,
                            side = side.as_str(),
                            %error,
                            "Crop prefetch failed"
                        );
                        CropStatus::Unavailable
                    }
                };
                // A reload may have dropped the Loading entry; don't resurrect it.
                if let Some(slot) = self.crops.get_mut(&(candidate_id, side)) {
                    *slot = status;
                }
            }
        }
    }
}
