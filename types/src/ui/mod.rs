//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;

pub use animation::{EffectTimer, normalized_progress};

/// Display options resolved from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// Screen rectangle in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }
}

/// Clickable areas recorded by the last draw, consumed by mouse input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    pub card: Option<Region>,
    pub modal: Option<Region>,
    /// One row per reason option, in option order.
    pub reason_options: Vec<Region>,
    /// The "Enter reject" hint.
    pub reason_submit: Option<Region>,
    /// The "Tab no reason" hint.
    pub reason_skip: Option<Region>,
}

impl HitMap {
    /// Index of the reason option under the pointer.
    #[must_use]
    pub fn reason_option_at(&self, column: u16, row: u16) -> Option<usize> {
        self.reason_options
            .iter()
            .position(|region| region.contains(column, row))
    }

    /// Whether a click at this cell lands outside an open modal.
    #[must_use]
    pub fn is_backdrop(&self, column: u16, row: u16) -> bool {
        self.modal
            .is_some_and(|modal| !modal.contains(column, row))
    }
}
