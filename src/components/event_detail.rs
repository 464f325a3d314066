use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::calendar::grid;
use crate::calendar::{layout, Event, Placement, TeamDirectory};
use crate::theme;

/// Popup with an event's details and the events it collides with.
pub fn render_detail_popup(
    frame: &mut Frame,
    area: Rect,
    event: &Event,
    events: &[Event],
    placement: Placement,
    teams: &TeamDirectory,
) {
    let popup_w = area.width.min(60).max(30);
    let popup_h = area.height.min(18).max(8);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", event.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let dim = theme::current().dim;
    let team = teams.resolve(&event.team_id);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  ", Style::default().bg(theme::team_color(team))),
        Span::styled(format!(" {}", team.name), Style::default()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Day: ", dim),
        Span::raw(grid::day_label(event.day_index)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Time: ", dim),
        Span::raw(format!(
            "{} ({})",
            event.time_range_display(),
            grid::duration_text(event.duration)
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Repeats: ", dim),
        Span::raw(event.frequency.as_str().to_string()),
    ]));

    let conflicts = layout::overlapping(event, events);
    lines.push(Line::from(""));
    if conflicts.is_empty() {
        lines.push(Line::from(Span::styled("No overlapping events", dim)));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Overlaps: ", dim),
            Span::raw(format!("column {} of {}", column_number(placement), placement.columns)),
        ]));
        for other in conflicts {
            let other_team = teams.resolve(&other.team_id);
            lines.push(Line::from(vec![
                Span::styled("  ", Style::default().bg(theme::team_color(other_team))),
                Span::raw(format!(" {} ", other.title)),
                Span::styled(other.time_range_display(), dim),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "e:Edit  d:Delete  m:Move  Esc:Close",
        dim,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

fn column_number(placement: Placement) -> usize {
    if placement.width_percent <= 0.0 {
        return 1;
    }
    (placement.left_percent / placement.width_percent).round() as usize + 1
}
