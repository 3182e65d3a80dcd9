use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use pairdeck_engine::{App, HitMap, ReasonPicker, Region};

use crate::format::truncate_with_ellipsis;
use crate::theme::{Glyphs, Palette, styles};

const MODAL_WIDTH: u16 = 48;
/// Rows above the first option inside the padded block: heading and spacer.
const OPTIONS_TOP: u16 = 2;
/// Border plus uniform padding.
const INSET: u16 = 2;
const SUBMIT_HINT: (&str, &str) = ("Enter", " reject");
const SKIP_HINT: (&str, &str) = ("Tab", " no reason");

pub(crate) fn draw_reason_modal(
    frame: &mut Frame,
    app: &App,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let Some(picker) = app.machine().reason() else {
        return;
    };

    let area = frame.area();
    let width = MODAL_WIDTH.min(area.width.saturating_sub(4));
    let inner_width = width.saturating_sub(2 * INSET) as usize;

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Why reject this pairing?",
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for index in 0..ReasonPicker::OPTION_COUNT {
        let is_cursor = index == picker.cursor();
        let is_selected = picker.selected() == Some(index);
        let radio = if is_selected {
            glyphs.radio_on
        } else {
            glyphs.radio_off
        };
        let pointer = if is_cursor { glyphs.selected } else { " " };
        let label = truncate_with_ellipsis(ReasonPicker::option_label(index), inner_width.saturating_sub(8));
        let style = if is_selected {
            Style::default()
                .fg(palette.reject)
                .add_modifier(Modifier::BOLD)
        } else if is_cursor {
            Style::default().fg(palette.text_primary).bg(palette.bg_highlight)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{pointer} "), styles::key_highlight(palette)),
            Span::styled(format!("{radio} "), style),
            Span::styled(format!("{} ", index + 1), styles::key_hint(palette)),
            Span::styled(label, style),
        ]));
    }

    if picker.is_other_selected() {
        lines.push(Line::from(""));
        let text = picker.other_text();
        let shown = if text.is_empty() {
            Span::styled("describe the mismatch", styles::key_hint(palette))
        } else {
            Span::styled(
                truncate_with_ellipsis(text, inner_width.saturating_sub(4)),
                Style::default().fg(palette.text_primary),
            )
        };
        lines.push(Line::from(vec![
            Span::styled("  > ", styles::key_highlight(palette)),
            shown,
            Span::styled("_", Style::default().fg(palette.accent)),
        ]));
    }

    lines.push(Line::from(""));
    let confirm_style = if picker.is_armed() {
        styles::key_highlight(palette)
    } else {
        Style::default().fg(palette.text_disabled)
    };
    let hint_row = lines.len() as u16;
    lines.push(Line::from(vec![
        Span::styled(SUBMIT_HINT.0, confirm_style),
        Span::styled(SUBMIT_HINT.1, styles::key_hint(palette)),
        Span::styled("  ", styles::key_hint(palette)),
        Span::styled(SKIP_HINT.0, styles::key_highlight(palette)),
        Span::styled(SKIP_HINT.1, styles::key_hint(palette)),
        Span::styled("  ", styles::key_hint(palette)),
        Span::styled("Esc", styles::key_highlight(palette)),
        Span::styled(" cancel", styles::key_hint(palette)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.reject))
        .style(Style::default().bg(palette.bg_popup))
        .title(Span::styled(" Reject ", styles::reject(palette)))
        .padding(Padding::uniform(1));

    let height = (lines.len() as u16)
        .saturating_add(2 * INSET)
        .min(area.height);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);

    hits.modal = Some(Region::new(rect.x, rect.y, rect.width, rect.height));
    let option_width = rect.width.saturating_sub(2 * INSET);
    let bottom = rect.y.saturating_add(rect.height).saturating_sub(INSET);
    hits.reason_options = (0..ReasonPicker::OPTION_COUNT as u16)
        .map(|i| rect.y + INSET + OPTIONS_TOP + i)
        .take_while(|row| *row < bottom)
        .map(|row| Region::new(rect.x + INSET, row, option_width, 1))
        .collect();

    let row = rect.y + INSET + hint_row;
    if row < bottom {
        let left = rect.x + INSET;
        let right = rect.x.saturating_add(rect.width).saturating_sub(INSET);
        let submit_width = hint_width(SUBMIT_HINT);
        let skip_x = left + submit_width + 2;
        hits.reason_submit = Some(Region::new(
            left,
            row,
            submit_width.min(right.saturating_sub(left)),
            1,
        ));
        if skip_x < right {
            hits.reason_skip = Some(Region::new(
                skip_x,
                row,
                hint_width(SKIP_HINT).min(right - skip_x),
                1,
            ));
        }
    }
}

fn hint_width((key, label): (&str, &str)) -> u16 {
    (key.len() + label.len()) as u16
}
