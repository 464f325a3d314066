//! Which events belong in a given (day, quarter-hour) cell of the week view.

use std::collections::BTreeSet;

use super::event::Event;
use super::grid::{self, Week};
use super::team::TeamDirectory;

/// Team names currently shown. Empty means every team is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFilter {
    names: BTreeSet<String>,
}

impl TeamFilter {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Add the name if absent, remove it if present.
    pub fn toggle(&mut self, name: &str) {
        if !self.names.remove(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn allows(&self, event: &Event, teams: &TeamDirectory) -> bool {
        self.is_empty() || self.contains(&teams.resolve(&event.team_id).name)
    }
}

impl<S: Into<String>> FromIterator<S> for TeamFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Events drawn in this cell: the ones whose first slot it is.
pub fn events_starting_at<'a>(
    display_day: usize,
    time_slot: f64,
    week: Week,
    events: &'a [Event],
    teams: &TeamDirectory,
    filter: &TeamFilter,
) -> Vec<&'a Event> {
    let day_index = grid::absolute_day(display_day, week);
    events
        .iter()
        .filter(|e| e.day_index == day_index && e.starts_at(time_slot) && filter.allows(e, teams))
        .collect()
}

/// Events occupying this cell, whether or not they start in it.
pub fn events_active_during<'a>(
    display_day: usize,
    time_slot: f64,
    week: Week,
    events: &'a [Event],
    teams: &TeamDirectory,
    filter: &TeamFilter,
) -> Vec<&'a Event> {
    let day_index = grid::absolute_day(display_day, week);
    events
        .iter()
        .filter(|e| e.day_index == day_index && e.is_active_during(time_slot) && filter.allows(e, teams))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::{EventId, Frequency};

    fn ev(id: u64, team: &str, day: usize, start: f64, duration: f64) -> Event {
        Event {
            id: EventId::Num(id),
            team_id: team.into(),
            title: "Ceremony".into(),
            day_index: day,
            start_time: start,
            duration,
            frequency: Frequency::Weekly,
        }
    }

    #[test]
    fn only_the_start_slot_draws_the_event() {
        let teams = TeamDirectory::default();
        let events = vec![ev(1, "teamA", 0, 8.0, 1.0)];
        let all = TeamFilter::default();

        assert_eq!(events_starting_at(0, 8.0, Week::One, &events, &teams, &all).len(), 1);
        for slot in [8.25, 8.5, 8.75] {
            assert!(events_starting_at(0, slot, Week::One, &events, &teams, &all).is_empty());
            assert_eq!(events_active_during(0, slot, Week::One, &events, &teams, &all).len(), 1);
        }
        assert!(events_active_during(0, 9.0, Week::One, &events, &teams, &all).is_empty());
    }

    #[test]
    fn display_day_maps_through_the_week() {
        let teams = TeamDirectory::default();
        let events = vec![ev(1, "teamA", 8, 9.0, 0.5), ev(2, "teamA", 3, 9.0, 0.5)];
        let all = TeamFilter::default();

        let week_two = events_starting_at(3, 9.0, Week::Two, &events, &teams, &all);
        assert_eq!(week_two.len(), 1);
        assert_eq!(week_two[0].id, EventId::Num(1));
        let week_one = events_starting_at(3, 9.0, Week::One, &events, &teams, &all);
        assert_eq!(week_one[0].id, EventId::Num(2));
    }

    #[test]
    fn filter_matches_resolved_team_names() {
        let teams = TeamDirectory::default();
        let events = vec![
            ev(1, "teamA", 0, 8.0, 0.5),
            ev(2, "teamB", 0, 8.0, 0.5),
            ev(3, "dangling", 0, 8.0, 0.5),
        ];

        let only_b: TeamFilter = ["Team B"].into_iter().collect();
        let hits = events_starting_at(0, 8.0, Week::One, &events, &teams, &only_b);
        assert_eq!(hits.iter().map(|e| e.id.clone()).collect::<Vec<_>>(), vec![EventId::Num(2)]);

        let mut rnd = TeamFilter::default();
        rnd.toggle("R&D Events");
        let hits = events_starting_at(0, 8.0, Week::One, &events, &teams, &rnd);
        assert_eq!(hits[0].id, EventId::Num(3));
        rnd.toggle("R&D Events");
        assert!(rnd.is_empty());
    }

    #[test]
    fn results_keep_input_order() {
        let teams = TeamDirectory::default();
        let events = vec![ev(5, "teamA", 1, 10.0, 0.25), ev(2, "teamB", 1, 10.0, 0.5)];
        let hits = events_starting_at(1, 10.0, Week::One, &events, &teams, &TeamFilter::default());
        assert_eq!(hits[0].id, EventId::Num(5));
        assert_eq!(hits[1].id, EventId::Num(2));
    }
}
