//! Card transforms for the review screen.

use ratatui::layout::Rect;

use pairdeck_engine::CardPose;

/// Shift the card rectangle horizontally by the pose's pixel offset.
///
/// The card is clamped so at least one column stays inside the viewport.
#[must_use]
pub fn offset_card(base: Rect, pose: &CardPose, pixels_per_column: f32, viewport: Rect) -> Rect {
    let columns = (pose.translate_x / pixels_per_column.max(1.0)).round() as i32;
    let viewport_left = i32::from(viewport.x);
    let viewport_right = i32::from(viewport.x) + i32::from(viewport.width);
    let min_x = viewport_left - i32::from(base.width) + 1;
    let max_x = viewport_right - 1;
    let x = (i32::from(base.x) + columns).clamp(min_x, max_x);

    // Clip against the viewport instead of letting ratatui panic on overflow.
    let left = x.max(viewport_left);
    let right = (x + i32::from(base.width)).min(viewport_right);
    Rect {
        x: left as u16,
        y: base.y,
        width: (right - left).max(0) as u16,
        height: base.height,
    }
}

/// Whether a fading card should still be drawn at this opacity.
#[must_use]
pub fn is_visible(pose: &CardPose) -> bool {
    pose.opacity > 0.15
}

/// Number of glow columns to light out of `max`, for a glow intensity 0..=1.
#[must_use]
pub fn glow_columns(intensity: f32, max: u16) -> u16 {
    (intensity.clamp(0.0, 1.0) * f32::from(max)).ceil() as u16
}
