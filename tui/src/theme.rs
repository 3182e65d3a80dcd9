//! Color theme and glyphs for the pairdeck TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use pairdeck_engine::UiOptions;

/// Kanagawa Wave colors, named by the role they play on the review deck.
mod colors {
    use super::Color;

    pub const INK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const CARD: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const CURSOR_ROW: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const DIALOG: Color = Color::Rgb(54, 54, 70); // sumiInk5
    pub const RULE: Color = Color::Rgb(84, 84, 109); // sumiInk6

    pub const TEXT: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const DETAIL: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const HINT: Color = Color::Rgb(114, 113, 105); // fujiGray
    pub const FADED: Color = Color::Rgb(113, 124, 124); // katanaGray

    pub const BRAND: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const INFO: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const CONFIRM: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const SKIP: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const KEY: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const REJECT: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
///
/// `confirm`, `reject` and `skip` color the matching glow, counters and
/// buttons everywhere, so a decision always reads the same way.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_popup: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub primary: Color,
    pub accent: Color,
    pub confirm: Color,
    pub reject: Color,
    pub skip: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::INK,
            bg_panel: colors::CARD,
            bg_highlight: colors::CURSOR_ROW,
            bg_popup: colors::DIALOG,
            bg_border: colors::RULE,
            text_primary: colors::TEXT,
            text_secondary: colors::DETAIL,
            text_muted: colors::HINT,
            text_disabled: colors::FADED,
            primary: colors::BRAND,
            accent: colors::INFO,
            confirm: colors::CONFIRM,
            reject: colors::REJECT,
            skip: colors::SKIP,
            peach: colors::KEY,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_popup: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            text_disabled: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            confirm: Color::Green,
            reject: Color::Red,
            skip: Color::Yellow,
            peach: Color::Yellow,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub confirm: &'static str,
    pub reject: &'static str,
    pub skip: &'static str,
    pub undo: &'static str,
    pub arrow_left: &'static str,
    pub arrow_right: &'static str,
    pub arrow_down: &'static str,
    pub bullet: &'static str,
    pub selected: &'static str,
    pub radio_on: &'static str,
    pub radio_off: &'static str,
    pub glow: &'static str,
    pub tilt_left: &'static str,
    pub tilt_right: &'static str,
    pub gauge_filled: &'static str,
    pub gauge_empty: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            confirm: "OK",
            reject: "X",
            skip: ">>",
            undo: "<-",
            arrow_left: "<",
            arrow_right: ">",
            arrow_down: "v",
            bullet: "*",
            selected: ">",
            radio_on: "(*)",
            radio_off: "( )",
            glow: "#",
            tilt_left: "\\",
            tilt_right: "/",
            gauge_filled: "#",
            gauge_empty: ".",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            confirm: "✓",
            reject: "✗",
            skip: "»",
            undo: "↶",
            arrow_left: "←",
            arrow_right: "→",
            arrow_down: "↓",
            bullet: "•",
            selected: "▸",
            radio_on: "◉",
            radio_off: "○",
            glow: "┃",
            tilt_left: "⟲",
            tilt_right: "⟳",
            gauge_filled: "█",
            gauge_empty: "░",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_inactive(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn confirm(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.confirm)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn reject(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.reject)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn skip(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.skip)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use pairdeck_engine::UiOptions;

    use super::{glyphs, spinner_frame};

    #[test]
    fn spinner_frame_cycles_without_reduced_motion() {
        let options = UiOptions::default();
        let frame0 = spinner_frame(0, options);
        let frame1 = spinner_frame(1, options);
        assert_ne!(frame0, frame1, "spinner should cycle through frames");
    }

    #[test]
    fn spinner_frame_static_with_reduced_motion() {
        let options = UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        };
        let frame0 = spinner_frame(0, options);
        let frame1 = spinner_frame(1, options);
        let frame100 = spinner_frame(100, options);
        assert_eq!(
            frame0, frame1,
            "spinner should be static with reduced_motion"
        );
        assert_eq!(frame0, frame100, "spinner should remain static at any tick");
    }

    #[test]
    fn ascii_glyphs_are_ascii() {
        let glyphs = glyphs(UiOptions {
            ascii_only: true,
            ..UiOptions::default()
        });
        for glyph in [
            glyphs.confirm,
            glyphs.reject,
            glyphs.skip,
            glyphs.undo,
            glyphs.glow,
            glyphs.gauge_filled,
            glyphs.gauge_empty,
        ] {
            assert!(glyph.is_ascii(), "{glyph:?} is not ascii");
        }
    }
}
