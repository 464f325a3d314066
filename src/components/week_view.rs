use std::collections::HashMap;

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::grid::{self, Week, DAYS_PER_WEEK, SLOT_COUNT};
use crate::calendar::{slot, Event, EventId, Placement, TeamDirectory, TeamFilter};
use crate::theme;

const TIME_COL_W: u16 = 9;

/// Where the day columns and slot rows ended up on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub body_top: u16,
    pub rows: usize,
    pub first_slot: usize,
    /// (x, width) of each weekday column.
    pub columns: [(u16, u16); DAYS_PER_WEEK],
}

impl GridGeometry {
    /// Display day and slot under a screen position.
    pub fn hit(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        if y < self.body_top {
            return None;
        }
        let row = (y - self.body_top) as usize;
        if row >= self.rows {
            return None;
        }
        let day = self
            .columns
            .iter()
            .position(|&(cx, w)| x >= cx && x < cx + w)?;
        Some((day, self.first_slot + row))
    }

    fn row_y(&self, slot: usize) -> Option<u16> {
        if slot < self.first_slot || slot >= self.first_slot + self.rows {
            return None;
        }
        Some(self.body_top + (slot - self.first_slot) as u16)
    }
}

pub struct WeekViewProps<'a> {
    pub week: Week,
    pub events: &'a [Event],
    pub teams: &'a TeamDirectory,
    pub filter: &'a TeamFilter,
    pub placements: &'a HashMap<EventId, Placement>,
    /// (display day, slot)
    pub cursor: (usize, usize),
    pub scroll: usize,
    pub selected: Option<&'a EventId>,
    pub dragging: Option<&'a EventId>,
    pub today: Option<usize>,
    pub dates: [Option<NaiveDate>; DAYS_PER_WEEK],
}

pub struct WeekView;

impl WeekView {
    pub fn geometry(area: Rect, scroll: usize) -> Option<GridGeometry> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if inner.width < TIME_COL_W + DAYS_PER_WEEK as u16 || inner.height < 2 {
            return None;
        }
        let col_w = (inner.width - TIME_COL_W) / DAYS_PER_WEEK as u16;
        let mut columns = [(0u16, 0u16); DAYS_PER_WEEK];
        for (i, col) in columns.iter_mut().enumerate() {
            *col = (inner.x + TIME_COL_W + i as u16 * col_w, col_w);
        }
        let rows = ((inner.height - 1) as usize).min(SLOT_COUNT);
        Some(GridGeometry {
            body_top: inner.y + 1,
            rows,
            first_slot: scroll.min(SLOT_COUNT - rows),
            columns,
        })
    }

    pub fn render(frame: &mut Frame, area: Rect, props: &WeekViewProps) -> Option<GridGeometry> {
        let t = theme::current();
        let days = props.week.day_indices();
        let title = match (props.dates[0], props.dates[DAYS_PER_WEEK - 1]) {
            (Some(first), Some(last)) => format!(
                " Sprint Week {} \u{00b7} {} - {} ",
                props.week.number(),
                first.format("%b %d"),
                last.format("%b %d")
            ),
            _ => format!(" Sprint Week {} ", props.week.number()),
        };
        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let geo = Self::geometry(area, props.scroll)?;

        // Day headers
        for (display, day_index) in days.clone().enumerate() {
            let (x, w) = geo.columns[display];
            let name = grid::weekday_name(day_index);
            let label = match props.dates[display] {
                Some(date) if w >= 14 => format!("{} {}", name, date.format("%d")),
                _ if w >= 10 => name.to_string(),
                _ => name[..3].to_string(),
            };
            let style = if Some(day_index) == props.today {
                t.today
            } else if display == props.cursor.0 {
                t.selected
            } else {
                t.header
            };
            let header = Paragraph::new(Line::from(Span::styled(
                format!("{:^width$}", label, width = w as usize),
                style,
            )));
            frame.render_widget(header, Rect::new(x, inner.y, w, 1));
        }

        // Time labels and cursor cell
        for row in 0..geo.rows {
            let slot = geo.first_slot + row;
            let y = geo.body_top + row as u16;
            let time = grid::slot_time(slot);
            let style = if time.fract() == 0.0 {
                t.header
            } else {
                t.dim
            };
            let label = format!("{:>8} ", grid::format_time(time));
            frame.render_widget(
                Paragraph::new(Span::styled(label, style)),
                Rect::new(inner.x, y, TIME_COL_W, 1),
            );
            if slot == props.cursor.1 {
                let (x, w) = geo.columns[props.cursor.0];
                frame.render_widget(Paragraph::new("").style(t.highlight), Rect::new(x, y, w, 1));
            }
        }

        // Events, each drawn once from the slot it starts in
        for display in 0..DAYS_PER_WEEK {
            for slot_k in 0..SLOT_COUNT {
                let time = grid::slot_time(slot_k);
                let starting = slot::events_starting_at(
                    display,
                    time,
                    props.week,
                    props.events,
                    props.teams,
                    props.filter,
                );
                for event in starting {
                    let placement = props
                        .placements
                        .get(&event.id)
                        .copied()
                        .unwrap_or(Placement::FULL);
                    render_event(frame, &geo, display, slot_k, event, placement, props);
                }
            }
        }

        // Drop target marker
        if let Some(id) = props.dragging {
            if let Some(y) = geo.row_y(props.cursor.1) {
                let (x, w) = geo.columns[props.cursor.0];
                let title = props
                    .events
                    .iter()
                    .find(|e| &e.id == id)
                    .map(|e| e.title.as_str())
                    .unwrap_or("");
                let text: String = format!("\u{25b8} {}", title).chars().take(w as usize).collect();
                frame.render_widget(
                    Paragraph::new(Span::styled(text, t.selected.add_modifier(Modifier::BOLD))),
                    Rect::new(x, y, w, 1),
                );
            }
        }

        Some(geo)
    }
}

/// Horizontal cell span for a placement inside a column of `width` cells.
pub fn placement_span(placement: Placement, width: u16) -> (u16, u16) {
    let w = width as f64;
    let left = (placement.left_percent.clamp(0.0, 100.0) * w / 100.0).round() as u16;
    let right = (placement.right_percent().clamp(0.0, 100.0) * w / 100.0).round() as u16;
    let left = left.min(width.saturating_sub(1));
    (left, right.saturating_sub(left).max(1))
}

fn render_event(
    frame: &mut Frame,
    geo: &GridGeometry,
    display: usize,
    start_slot: usize,
    event: &Event,
    placement: Placement,
    props: &WeekViewProps,
) {
    let first_row = start_slot.max(geo.first_slot);
    let end_slot = start_slot.saturating_add(grid::slot_span(event.duration));
    let last_row = end_slot.min(geo.first_slot + geo.rows);
    if first_row >= last_row {
        return;
    }
    let Some(y) = geo.row_y(first_row) else {
        return;
    };
    let height = (last_row - first_row) as u16;

    let (col_x, col_w) = geo.columns[display];
    let (dx, w) = placement_span(placement, col_w);
    let area = Rect::new(col_x + dx, y, w, height);

    let team = props.teams.resolve(&event.team_id);
    let mut style = theme::event_style(team);
    if props.selected == Some(&event.id) {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    if props.dragging == Some(&event.id) {
        style = style.add_modifier(Modifier::DIM | Modifier::ITALIC);
    }

    let width = w as usize;
    let fit = |s: String| -> String {
        let s: String = s.chars().take(width).collect();
        format!("{:<width$}", s, width = width)
    };
    let mut lines = vec![Line::from(Span::styled(fit(event.title.clone()), style))];
    if height >= 2 {
        lines.push(Line::from(Span::styled(fit(event.time_range_display()), style)));
    }
    if height >= 3 {
        lines.push(Line::from(Span::styled(fit(team.name.clone()), style)));
    }
    for _ in lines.len()..height as usize {
        lines.push(Line::from(Span::styled(fit(String::new()), style)));
    }

    frame.render_widget(Paragraph::new(lines).style(style), area);
}
