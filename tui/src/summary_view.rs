use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use pairdeck_engine::{ARC_CIRCUMFERENCE, App, Summary};

use crate::theme::{Glyphs, Palette, styles};

const GAUGE_WIDTH: usize = 30;

/// Unrolls the completion arc onto `width` cells: the unfilled share of the
/// circumference becomes empty cells.
pub(crate) fn gauge_cells(summary: &Summary, width: usize) -> usize {
    let unfilled = (summary.arc_offset() / ARC_CIRCUMFERENCE).clamp(0.0, 1.0);
    let empty = (unfilled * width as f32).round() as usize;
    width.saturating_sub(empty)
}

pub(crate) fn draw_summary(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let summary = app.machine().summary();
    let filled = gauge_cells(&summary, GAUGE_WIDTH);

    let count_line = |glyph: &str, label: &str, value: usize, style: Style| {
        Line::from(vec![
            Span::styled(format!("{glyph} "), style),
            Span::styled(format!("{label:<10}"), Style::default().fg(palette.text_secondary)),
            Span::styled(value.to_string(), style.add_modifier(Modifier::BOLD)),
        ])
    };

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                glyphs.gauge_filled.repeat(filled),
                Style::default().fg(palette.accent),
            ),
            Span::styled(
                glyphs.gauge_empty.repeat(GAUGE_WIDTH - filled),
                Style::default().fg(palette.bg_border),
            ),
        ]),
        Line::from(Span::styled(
            format!("{}% reviewed", summary.percent()),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} of {} decided", summary.reviewed, summary.total),
            styles::key_hint(palette),
        )),
        Line::from(""),
        count_line(glyphs.confirm, "Confirmed", summary.confirmed, styles::confirm(palette)),
        count_line(glyphs.reject, "Rejected", summary.rejected, styles::reject(palette)),
        count_line(glyphs.skip, "Skipped", summary.skipped, styles::skip(palette)),
        Line::from(""),
    ];

    let mut hints = Vec::new();
    if summary.skipped > 0 {
        hints.push(Span::styled("r", styles::key_highlight(palette)));
        hints.push(Span::styled(
            format!(" review {} skipped  ", summary.skipped),
            styles::key_hint(palette),
        ));
    }
    hints.push(Span::styled("b", styles::key_highlight(palette)));
    hints.push(Span::styled(" back to queue  ", styles::key_hint(palette)));
    hints.push(Span::styled("z", styles::key_highlight(palette)));
    hints.push(Span::styled(" undo  ", styles::key_hint(palette)));
    hints.push(Span::styled("q", styles::key_highlight(palette)));
    hints.push(Span::styled(" quit", styles::key_hint(palette)));
    lines.push(Line::from(hints));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(" Session complete ", styles::title(palette)));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
