//! Creation-time expansion of a frequency tag into concrete grid rows.
//!
//! The tag is stored on every row but never re-expanded later: editing or
//! deleting one occurrence leaves its siblings alone.

use super::event::{Frequency, NewEvent};
use super::grid::{DAYS_PER_WEEK, DAY_COUNT};

pub fn expand(draft: NewEvent) -> Vec<NewEvent> {
    let days: Vec<usize> = match draft.frequency {
        Frequency::Daily => (0..DAY_COUNT).collect(),
        Frequency::Weekly => {
            let weekday = draft.day_index % DAYS_PER_WEEK;
            vec![weekday, weekday + DAYS_PER_WEEK]
        }
        Frequency::BiWeekly | Frequency::Monthly | Frequency::Other(_) => vec![draft.day_index],
    };

    days.into_iter()
        .map(|day_index| NewEvent {
            day_index,
            ..draft.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(day_index: usize, frequency: Frequency) -> NewEvent {
        NewEvent {
            team_id: "teamA".into(),
            title: "Daily Scrum".into(),
            day_index,
            start_time: 9.5,
            duration: 0.25,
            frequency,
        }
    }

    #[test]
    fn daily_fills_every_day() {
        let rows = expand(draft(2, Frequency::Daily));
        assert_eq!(rows.iter().map(|r| r.day_index).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert!(rows
            .iter()
            .all(|r| r.start_time == 9.5 && r.duration == 0.25 && r.title == "Daily Scrum"));
    }

    #[test]
    fn weekly_hits_the_same_weekday_in_both_weeks() {
        let days = |d| expand(draft(d, Frequency::Weekly)).iter().map(|r| r.day_index).collect::<Vec<_>>();
        assert_eq!(days(3), vec![3, 8]);
        assert_eq!(days(8), vec![3, 8]);
    }

    #[test]
    fn biweekly_monthly_and_unknown_stay_put() {
        for frequency in [Frequency::BiWeekly, Frequency::Monthly, Frequency::Other("Yearly".into())] {
            let rows = expand(draft(6, frequency.clone()));
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].day_index, 6);
            assert_eq!(rows[0].frequency, frequency);
        }
    }
}
