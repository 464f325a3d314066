//! Side-by-side placement of overlapping events within a day column.
//!
//! Each event's columns come from its own neighbourhood: itself plus the
//! events that directly overlap it. Neighbours of neighbours are not
//! considered, so in a chain A-B-C the middle event may be split three ways
//! from its own point of view while A and C each see only two columns.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::event::{Event, EventId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left_percent: f64,
    pub width_percent: f64,
    /// Size of the neighbourhood the placement was computed from.
    pub columns: usize,
}

impl Placement {
    pub const FULL: Placement = Placement {
        left_percent: 0.0,
        width_percent: 100.0,
        columns: 1,
    };

    pub fn right_percent(&self) -> f64 {
        self.left_percent + self.width_percent
    }
}

/// Events on `event`'s day that overlap it, excluding `event` itself.
pub fn overlapping<'a>(event: &Event, events: &'a [Event]) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| e.id != event.id && e.day_index == event.day_index && e.overlaps(event))
        .collect()
}

/// Start time first, then ids compared as strings.
fn column_order(a: &Event, b: &Event) -> Ordering {
    a.start_time
        .total_cmp(&b.start_time)
        .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
}

pub fn layout(event: &Event, day_events: &[Event]) -> Placement {
    let neighbours = overlapping(event, day_events);
    if neighbours.is_empty() {
        return Placement::FULL;
    }

    let mut group: Vec<&Event> = Vec::with_capacity(neighbours.len() + 1);
    group.push(event);
    group.extend(neighbours);
    group.sort_by(|a, b| column_order(a, b));

    let position = group.iter().position(|e| e.id == event.id).unwrap_or(0);
    let columns = group.len();
    let width = 100.0 / columns as f64;

    Placement {
        left_percent: position as f64 * width,
        width_percent: width,
        columns,
    }
}

/// Placements for every event on `day_index`.
pub fn layout_day(events: &[Event], day_index: usize) -> HashMap<EventId, Placement> {
    let day: Vec<Event> = events
        .iter()
        .filter(|e| e.day_index == day_index)
        .cloned()
        .collect();
    day.iter().map(|e| (e.id.clone(), layout(e, &day))).collect()
}
