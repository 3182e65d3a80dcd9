//! TUI rendering for pairdeck using ratatui.

mod effects;
mod format;
mod input;
mod queue_view;
mod reason_modal;
mod review;
mod summary_view;
mod theme;

pub use input::{Command, InputPump, KeyContext, apply_command, apply_event, handle_events, map_key};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use pairdeck_engine::{App, HitMap, Screen};

/// Main draw function.
///
/// Records where the card and reason options landed so mouse input can be
/// mapped back onto them on the next event.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let mut hits = HitMap::default();

    draw_header(frame, app, chunks[0], &palette);
    match app.machine().screen() {
        Screen::Queue => queue_view::draw_queue(frame, app, chunks[1], &palette, &glyphs),
        Screen::Review => {
            review::draw_review(frame, app, chunks[1], &palette, &glyphs, &mut hits);
        }
        Screen::Summary => summary_view::draw_summary(frame, app, chunks[1], &palette, &glyphs),
    }
    draw_status_bar(frame, app, chunks[2], &palette);

    if app.machine().reason().is_some() {
        reason_modal::draw_reason_modal(frame, app, &palette, &glyphs, &mut hits);
    }

    app.set_hit_map(hits);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let screen = match app.machine().screen() {
        Screen::Queue => "queue",
        Screen::Review => "review",
        Screen::Summary => "summary",
    };
    let line = Line::from(vec![
        Span::styled(
            "pairdeck",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {screen}"), Style::default().fg(palette.text_secondary)),
        Span::styled(
            format!("  filter: {}", app.machine().filter().label()),
            styles::key_hint(palette),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let sync = app.sync_stats();
    let left = if sync.failed > 0 {
        Span::styled(
            format!("{} submissions failed (logged)", sync.failed),
            styles::reject(palette),
        )
    } else if sync.in_flight() > 0 {
        Span::styled(
            format!("syncing {}", sync.in_flight()),
            Style::default().fg(palette.accent),
        )
    } else {
        Span::styled("synced", styles::key_hint(palette))
    };

    let right = format!(
        "sent {}  ok {}  crops {}/{}  ",
        sync.submitted,
        sync.acknowledged,
        sync.prefetched,
        sync.prefetched + sync.prefetch_failed
    );

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(left)), halves[0]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(right, styles::key_hint(palette))))
            .alignment(Alignment::Right),
        halves[1],
    );
}
