use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use pairdeck_engine::App;
use pairdeck_types::ConfidenceFilter;

use crate::format::truncate_with_ellipsis;
use crate::theme::{Glyphs, Palette, spinner_frame, styles};

const PREVIEW_ROWS: usize = 8;

pub(crate) fn draw_queue(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let machine = app.machine();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Spacer
            Constraint::Min(3),    // Body
        ])
        .split(area);

    let counts = machine.filter_counts();
    let mut tabs: Vec<Span> = Vec::new();
    for (i, filter) in ConfidenceFilter::ALL.into_iter().enumerate() {
        let label = format!(" {} {} ({}) ", i + 1, filter.label(), counts.get(filter));
        let style = if filter == machine.filter() {
            styles::tab_active(palette)
        } else {
            styles::tab_inactive(palette)
        };
        tabs.push(Span::styled(label, style));
        tabs.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    if machine.is_loading() {
        lines.push(Line::from(vec![
            Span::styled(
                spinner_frame(app.ticks(), app.ui_options()),
                Style::default().fg(palette.accent),
            ),
            Span::styled(
                " Loading candidates...",
                Style::default().fg(palette.text_secondary),
            ),
        ]));
    } else if machine.queue().is_empty() {
        lines.push(Line::from(Span::styled(
            "No candidates match this filter.",
            Style::default().fg(palette.text_muted),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("R", styles::key_highlight(palette)),
            Span::styled(" reload  ", styles::key_hint(palette)),
            Span::styled("f", styles::key_highlight(palette)),
            Span::styled(" change filter", styles::key_hint(palette)),
        ]));
    } else {
        let pending = machine.queue().len();
        lines.push(Line::from(vec![
            Span::styled(
                pending.to_string(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if pending == 1 {
                    " candidate pending review"
                } else {
                    " candidates pending review"
                },
                Style::default().fg(palette.text_secondary),
            ),
        ]));
        lines.push(Line::from(""));

        let width = chunks[2].width.saturating_sub(14) as usize;
        for candidate in machine.queue().iter().take(PREVIEW_ROWS) {
            let route = format!(
                "{} {} {}",
                candidate.endpoint_a.source_id, glyphs.arrow_right, candidate.endpoint_b.source_id
            );
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", glyphs.bullet), styles::key_hint(palette)),
                Span::styled(
                    format!("{:>3}%  ", candidate.confidence.percent()),
                    confidence_style(candidate.confidence.value(), palette),
                ),
                Span::styled(
                    truncate_with_ellipsis(&format!("{}  {route}", candidate.id), width),
                    Style::default().fg(palette.text_primary),
                ),
            ]));
        }
        if pending > PREVIEW_ROWS {
            lines.push(Line::from(Span::styled(
                format!("   ... and {} more", pending - PREVIEW_ROWS),
                styles::key_hint(palette),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" start review", styles::key_hint(palette)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(" Review queue ", styles::title(palette)));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[2]);
}

pub(crate) fn confidence_style(confidence: f64, palette: &Palette) -> Style {
    let color = if confidence >= pairdeck_types::HIGH_CONFIDENCE_THRESHOLD {
        palette.confirm
    } else {
        palette.skip
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
