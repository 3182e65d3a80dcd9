//! Review screen: the active card, glow bars and undo toast.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use pairdeck_engine::{App, CardPose, CropStatus, HitMap, Region};
use pairdeck_types::{EndpointSide, MatchCandidate};

use crate::effects::{glow_columns, is_visible, offset_card};
use crate::format::{format_bytes, format_clock, format_delta, truncate_with_ellipsis};
use crate::queue_view::confidence_style;
use crate::theme::{Glyphs, Palette, styles};

const CARD_WIDTH: u16 = 60;
const CARD_HEIGHT: u16 = 14;
const GLOW_WIDTH: u16 = 3;

pub(crate) fn draw_review(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let machine = app.machine();
    let session = machine.session();
    let total = machine.queue().len();
    let counters = session.counters();

    let header = Line::from(vec![
        Span::styled(
            format!(
                "Card {} of {}",
                (session.current_index() + 1).min(total),
                total
            ),
            styles::title(palette),
        ),
        Span::raw("   "),
        Span::styled(format!("{} {}", glyphs.confirm, counters.confirmed), styles::confirm(palette)),
        Span::raw("  "),
        Span::styled(format!("{} {}", glyphs.reject, counters.rejected), styles::reject(palette)),
        Span::raw("  "),
        Span::styled(format!("{} {}", glyphs.skip, counters.skipped), styles::skip(palette)),
    ]);
    frame.render_widget(
        Paragraph::new(header),
        Rect {
            height: area.height.min(1),
            ..area
        },
    );

    let Some(candidate) = machine.current() else {
        return;
    };

    let body = Rect {
        y: area.y.saturating_add(2),
        height: area.height.saturating_sub(4),
        ..area
    };
    let width = CARD_WIDTH.min(body.width.saturating_sub(2 * GLOW_WIDTH + 2));
    let height = CARD_HEIGHT.min(body.height);
    let base = Rect {
        x: body.x + (body.width.saturating_sub(width) / 2),
        y: body.y + (body.height.saturating_sub(height) / 2),
        width,
        height,
    };

    let pose = app.card_pose();
    draw_glow(frame, body, base, &pose, palette, glyphs);

    let card = offset_card(base, &pose, app.settings().pixels_per_column, body);
    if is_visible(&pose) && card.width > 2 {
        draw_card(frame, app, candidate, card, &pose, palette, glyphs);
    }
    hits.card = Some(Region::new(base.x, base.y, base.width, base.height));

    let footer_y = area.y + area.height.saturating_sub(1);
    let mut footer: Vec<Span> = vec![
        Span::styled(glyphs.arrow_left, styles::key_highlight(palette)),
        Span::styled(" reject  ", styles::key_hint(palette)),
        Span::styled(glyphs.arrow_right, styles::key_highlight(palette)),
        Span::styled(" confirm  ", styles::key_hint(palette)),
        Span::styled(glyphs.arrow_down, styles::key_highlight(palette)),
        Span::styled(" skip  ", styles::key_hint(palette)),
        Span::styled("z", styles::key_highlight(palette)),
        Span::styled(" undo", styles::key_hint(palette)),
    ];
    if machine.undo_visible() {
        footer.push(Span::raw("    "));
        footer.push(Span::styled(
            format!(" {} Undo last decision (z) ", glyphs.undo),
            Style::default()
                .fg(palette.bg_dark)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(footer)),
        Rect {
            y: footer_y,
            height: area.height.min(1),
            ..area
        },
    );
}

fn draw_glow(
    frame: &mut Frame,
    body: Rect,
    base: Rect,
    pose: &CardPose,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let left = glow_columns(pose.glow_left, GLOW_WIDTH);
    let right = glow_columns(pose.glow_right, GLOW_WIDTH);
    let rows = base.height;
    if left > 0 {
        let strip = Rect::new(body.x, base.y, left, rows);
        let lines: Vec<Line> = (0..rows)
            .map(|_| Line::from(Span::styled(glyphs.glow.repeat(left as usize), styles::reject(palette))))
            .collect();
        frame.render_widget(Paragraph::new(lines), strip);
    }
    if right > 0 {
        let x = (body.x + body.width).saturating_sub(right);
        let strip = Rect::new(x, base.y, right, rows);
        let lines: Vec<Line> = (0..rows)
            .map(|_| Line::from(Span::styled(glyphs.glow.repeat(right as usize), styles::confirm(palette))))
            .collect();
        frame.render_widget(Paragraph::new(lines), strip);
    }
}

fn draw_card(
    frame: &mut Frame,
    app: &App,
    candidate: &MatchCandidate,
    rect: Rect,
    pose: &CardPose,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let border_color = if pose.glow_right >= 1.0 {
        palette.confirm
    } else if pose.glow_left >= 1.0 {
        palette.reject
    } else {
        palette.primary
    };
    let text_style = if pose.opacity < 0.6 {
        Style::default().fg(palette.text_disabled)
    } else {
        Style::default().fg(palette.text_primary)
    };

    let mut title = vec![
        Span::styled(format!(" {} ", candidate.id), styles::title(palette)),
        Span::styled(
            format!("{}% ", candidate.confidence.percent()),
            confidence_style(candidate.confidence.value(), palette),
        ),
    ];
    if !app.ui_options().reduced_motion && pose.rotation_deg.abs() >= 1.0 {
        let tilt = if pose.rotation_deg > 0.0 {
            glyphs.tilt_right
        } else {
            glyphs.tilt_left
        };
        title.push(Span::styled(
            format!("{tilt} {:+.0}° ", pose.rotation_deg),
            styles::key_hint(palette),
        ));
    }

    let inner_width = rect.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for side in EndpointSide::BOTH {
        lines.extend(endpoint_lines(app, candidate, side, inner_width, text_style, palette));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("Transit ", styles::key_hint(palette)),
        Span::styled(format_delta(candidate.transit()), text_style),
    ]));
    let mut meta = Vec::new();
    if let Some(method) = &candidate.match_method {
        meta.push(format!("method {method}"));
    }
    if let Some(entity) = &candidate.entity_type {
        meta.push(format!("type {entity}"));
    }
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(&meta.join(" · "), inner_width),
            styles::key_hint(palette),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.bg_panel))
        .title(Line::from(title))
        .title_alignment(Alignment::Left);

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn endpoint_lines(
    app: &App,
    candidate: &MatchCandidate,
    side: EndpointSide,
    width: usize,
    text_style: Style,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let endpoint = candidate.endpoint(side);
    let heading = format!(
        "{}  {} / {}",
        side.as_str().to_uppercase(),
        endpoint.source_id,
        endpoint.track_id
    );
    let mut detail = format!(
        "{} - {} ({})",
        format_clock(endpoint.first_seen),
        format_clock(endpoint.last_seen),
        format_delta(endpoint.dwell())
    );
    if let Some(label) = endpoint.label() {
        detail.push_str("  ");
        detail.push_str(label);
    }
    let crop = match app.crop_status(&candidate.id, side) {
        Some(CropStatus::Ready { bytes }) => format!("crop {}", format_bytes(bytes)),
        Some(CropStatus::Loading) => "crop loading".to_string(),
        Some(CropStatus::Unavailable) => "crop unavailable".to_string(),
        None => "crop pending".to_string(),
    };
    vec![
        Line::from(Span::styled(
            truncate_with_ellipsis(&heading, width),
            text_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_with_ellipsis(&detail, width),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(Span::styled(crop, styles::key_hint(palette))),
    ]
}
