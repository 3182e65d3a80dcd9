//! Drag recognition and card pose.
//!
//! All distances are device-independent pixels. The input adapter is
//! responsible for converting terminal cells into pixels before they get here.

/// A release must travel strictly further than this to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 80.0;
pub const DEGREES_PER_PIXEL: f32 = 0.05;
pub const MAX_ROTATION_DEG: f32 = 12.0;
/// Extra travel of a card leaving the screen after a decision.
const EXIT_TRAVEL: f32 = 400.0;

/// Pointer drag in progress on the active card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    anchor_x: f32,
    dx: f32,
}

impl DragState {
    #[must_use]
    pub fn new(anchor_x: f32) -> Self {
        Self { anchor_x, dx: 0.0 }
    }

    pub fn update(&mut self, x: f32) {
        self.dx = x - self.anchor_x;
    }

    #[must_use]
    pub fn dx(&self) -> f32 {
        self.dx
    }
}

/// What a pointer release means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Confirm,
    OpenReject,
    SnapBack,
}

#[must_use]
pub fn classify_release(dx: f32) -> Release {
    if dx > SWIPE_THRESHOLD {
        Release::Confirm
    } else if dx < -SWIPE_THRESHOLD {
        Release::OpenReject
    } else {
        Release::SnapBack
    }
}

/// Exit animation assigned to a decided card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    SwipeRight,
    SwipeLeft,
    Fade,
}

/// Visual state of the active card.
///
/// Each transient variant has a declared duration driven by a timeout event;
/// see [`crate::TimerKind`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CardMotion {
    #[default]
    Neutral,
    Dragging(DragState),
    /// Parked at the release offset while the reason modal is open.
    AwaitingReason { dx: f32 },
    SnappingBack { from_dx: f32 },
    Exiting { kind: ExitKind, from_dx: f32 },
}

impl CardMotion {
    /// Horizontal offset the card currently rests at, ignoring animation progress.
    #[must_use]
    pub fn offset(&self) -> f32 {
        match self {
            Self::Neutral => 0.0,
            Self::Dragging(drag) => drag.dx(),
            Self::AwaitingReason { dx } => *dx,
            Self::SnappingBack { from_dx } | Self::Exiting { from_dx, .. } => *from_dx,
        }
    }

    /// Pose at `progress` (0..=1) through the current transient state.
    #[must_use]
    pub fn pose(&self, progress: f32) -> CardPose {
        let t = ease_out_cubic(progress);
        match *self {
            Self::Neutral => CardPose::NEUTRAL,
            Self::Dragging(drag) => CardPose::at_offset(drag.dx()),
            Self::AwaitingReason { dx } => CardPose::at_offset(dx),
            Self::SnappingBack { from_dx } => CardPose::at_offset(from_dx * (1.0 - t)),
            Self::Exiting { kind, from_dx } => match kind {
                ExitKind::SwipeRight => CardPose::at_offset(from_dx.max(0.0) + t * EXIT_TRAVEL),
                ExitKind::SwipeLeft => CardPose::at_offset(from_dx.min(0.0) - t * EXIT_TRAVEL),
                ExitKind::Fade => CardPose {
                    opacity: 1.0 - t,
                    ..CardPose::at_offset(from_dx)
                },
            },
        }
    }
}

/// Transform and edge glow of the active card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub translate_x: f32,
    pub rotation_deg: f32,
    /// Reject-side glow, 0..=1.
    pub glow_left: f32,
    /// Confirm-side glow, 0..=1.
    pub glow_right: f32,
    pub opacity: f32,
}

impl CardPose {
    pub const NEUTRAL: Self = Self {
        translate_x: 0.0,
        rotation_deg: 0.0,
        glow_left: 0.0,
        glow_right: 0.0,
        opacity: 1.0,
    };

    #[must_use]
    pub fn at_offset(dx: f32) -> Self {
        let rotation_deg = (dx * DEGREES_PER_PIXEL).clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG);
        let intensity = (dx.abs() / SWIPE_THRESHOLD).min(1.0);
        let (glow_left, glow_right) = if dx > 0.0 {
            (0.0, intensity)
        } else if dx < 0.0 {
            (intensity, 0.0)
        } else {
            (0.0, 0.0)
        };
        Self {
            translate_x: dx,
            rotation_deg,
            glow_left,
            glow_right,
            opacity: 1.0,
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}
