//! Seed data: the default team set and the default sprint ceremony schedule.

use super::event::{Event, EventId, Frequency};
use super::team::Team;

pub const FALLBACK_TEAM_ID: &str = "rndEvents";
pub const RESERVED_TEAM_NAME: &str = "R&D Events";

pub fn fallback_team() -> Team {
    team(FALLBACK_TEAM_ID, RESERVED_TEAM_NAME, "#95A5A6")
}

pub fn teams() -> Vec<Team> {
    vec![
        team("teamA", "Team A", "#4A90E2"),
        team("teamB", "Team B", "#E94B3C"),
        team("teamC", "Team C", "#50C878"),
        team("teamD", "Team D", "#9B59B6"),
        fallback_team(),
    ]
}

fn team(id: &str, name: &str, color: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

const SEED: &[(u64, &str, &str, usize, f64, f64, &str)] = &[
    // Week 1, Monday: retros
    (1, "teamA", "Retro", 0, 8.0, 0.5, "Bi-weekly"),
    (2, "teamB", "Retro", 0, 8.5, 0.5, "Bi-weekly"),
    (3, "teamC", "Retro", 0, 9.0, 0.5, "Bi-weekly"),
    (4, "teamD", "Retro", 0, 9.5, 0.5, "Bi-weekly"),
    // Tuesday: all hands only
    (5, "rndEvents", "All Hands Meeting", 1, 9.0, 2.0, "Weekly"),
    // Wednesday
    (103, "teamC", "Daily Scrum", 2, 7.5, 0.25, "Daily"),
    (104, "teamD", "Daily Scrum", 2, 7.75, 0.25, "Daily"),
    (6, "teamA", "Grooming + Estimation", 2, 8.0, 1.0, "Weekly"),
    (7, "teamB", "Grooming + Estimation", 2, 9.0, 1.0, "Weekly"),
    // Thursday
    (8, "teamC", "Grooming + Estimation", 3, 7.5, 1.0, "Weekly"),
    (9, "teamD", "Grooming + Estimation", 3, 8.5, 1.0, "Weekly"),
    (105, "teamA", "Daily Scrum", 3, 9.5, 0.25, "Daily"),
    (106, "teamB", "Daily Scrum", 3, 9.75, 0.25, "Daily"),
    // Friday
    (107, "teamA", "Daily Scrum", 4, 8.0, 0.25, "Daily"),
    (108, "teamB", "Daily Scrum", 4, 8.25, 0.25, "Daily"),
    (109, "teamC", "Daily Scrum", 4, 8.5, 0.25, "Daily"),
    (110, "teamD", "Daily Scrum", 4, 8.75, 0.25, "Daily"),
    // Week 2, Monday
    (201, "teamA", "Daily Scrum", 5, 8.0, 0.25, "Daily"),
    (202, "teamB", "Daily Scrum", 5, 8.25, 0.25, "Daily"),
    (203, "teamC", "Daily Scrum", 5, 8.5, 0.25, "Daily"),
    (204, "teamD", "Daily Scrum", 5, 8.75, 0.25, "Daily"),
    // Tuesday
    (10, "rndEvents", "All Hands Meeting", 6, 9.0, 2.0, "Weekly"),
    // Wednesday
    (205, "teamC", "Daily Scrum", 7, 7.5, 0.25, "Daily"),
    (206, "teamD", "Daily Scrum", 7, 7.75, 0.25, "Daily"),
    (11, "teamA", "Grooming + Estimation", 7, 8.0, 1.0, "Weekly"),
    (12, "teamB", "Grooming + Estimation", 7, 9.0, 1.0, "Weekly"),
    // Thursday
    (13, "teamC", "Grooming + Estimation", 8, 7.5, 1.0, "Weekly"),
    (14, "teamD", "Grooming + Estimation", 8, 8.5, 1.0, "Weekly"),
    (207, "teamB", "Daily Scrum", 8, 9.5, 0.25, "Daily"),
    (15, "teamA", "Sprint Planning", 8, 9.75, 0.75, "Bi-weekly"),
    // Friday: sprint planning, no scrums
    (16, "teamB", "Sprint Planning", 9, 7.75, 0.75, "Bi-weekly"),
    (17, "teamC", "Sprint Planning", 9, 8.5, 0.75, "Bi-weekly"),
    (18, "teamD", "Sprint Planning", 9, 9.25, 0.75, "Bi-weekly"),
];

pub fn events() -> Vec<Event> {
    SEED.iter()
        .map(|&(id, team_id, title, day_index, start_time, duration, frequency)| Event {
            id: EventId::Num(id),
            team_id: team_id.to_string(),
            title: title.to_string(),
            day_index,
            start_time,
            duration,
            frequency: Frequency::parse(frequency),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::calendar::grid::{self, DAY_COUNT};

    #[test]
    fn seed_is_on_the_grid() {
        let events = events();
        let ids: HashSet<String> = events.iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids.len(), events.len());
        for e in &events {
            assert!(e.day_index < DAY_COUNT);
            assert!(grid::slot_index(e.start_time).is_some(), "{:?}", e);
            assert!(teams().iter().any(|t| t.id == e.team_id));
        }
    }
}
