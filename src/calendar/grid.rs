//! The fixed sprint grid: ten weekdays across two weeks, quarter-hour slots
//! from 06:00 to the 17:00 closing boundary.
//!
//! All times are decimal hours. Quarter-hour values are exact in binary
//! floating point, so slot arithmetic never drifts.

pub const DAYS_PER_WEEK: usize = 5;
pub const WEEKS: usize = 2;
pub const DAY_COUNT: usize = DAYS_PER_WEEK * WEEKS;

pub const DAY_START: f64 = 6.0;
pub const DAY_END: f64 = 17.0;
pub const SLOT_HOURS: f64 = 0.25;
/// 44 quarter-hours plus the closing boundary row at 17:00.
pub const SLOT_COUNT: usize = 45;

/// Default first visible row (07:00).
pub const DEFAULT_SCROLL_SLOT: usize = 4;

const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Week {
    #[default]
    One,
    Two,
}

impl Week {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Week::One),
            2 => Some(Week::Two),
            _ => None,
        }
    }

    pub fn number(self) -> usize {
        match self {
            Week::One => 1,
            Week::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Week::One => Week::Two,
            Week::Two => Week::One,
        }
    }

    /// Absolute day indices shown when this week is displayed.
    pub fn day_indices(self) -> std::ops::Range<usize> {
        let first = (self.number() - 1) * DAYS_PER_WEEK;
        first..first + DAYS_PER_WEEK
    }
}

/// Map a week-relative column to the stored `day_index`.
pub fn absolute_day(display_index: usize, week: Week) -> usize {
    display_index + (week.number() - 1) * DAYS_PER_WEEK
}

/// Inverse of [`absolute_day`].
pub fn display_day(day_index: usize) -> (usize, Week) {
    let week = if day_index < DAYS_PER_WEEK { Week::One } else { Week::Two };
    (day_index % DAYS_PER_WEEK, week)
}

pub fn slot_time(slot: usize) -> f64 {
    DAY_START + SLOT_HOURS * slot as f64
}

/// Slot whose start equals `time` exactly, if it lies on the grid.
pub fn slot_index(time: f64) -> Option<usize> {
    (0..SLOT_COUNT).find(|&k| slot_time(k) == time)
}

/// Row a time falls into, clamped to the grid. Used for off-grid values.
pub fn slot_at_or_before(time: f64) -> usize {
    if !time.is_finite() || time <= DAY_START {
        return 0;
    }
    let k = ((time - DAY_START) / SLOT_HOURS).floor() as usize;
    k.min(SLOT_COUNT - 1)
}

/// Number of grid rows an event of `duration` hours spans, between one row
/// and the whole day.
pub fn slot_span(duration: f64) -> usize {
    if !duration.is_finite() || duration <= 0.0 {
        return 1;
    }
    ((duration / SLOT_HOURS).ceil() as usize).clamp(1, SLOT_COUNT)
}

pub fn weekday_name(day_index: usize) -> &'static str {
    WEEKDAY_NAMES[day_index % DAYS_PER_WEEK]
}

pub fn day_label(day_index: usize) -> String {
    let (_, week) = display_day(day_index);
    format!("Week {} - {}", week.number(), weekday_name(day_index))
}

/// `8.25` -> `"8:15 AM"`, `13.5` -> `"1:30 PM"`.
pub fn format_time(time: f64) -> String {
    let total = (time * 60.0).round() as i64;
    let (hour, minutes) = (total.div_euclid(60), total.rem_euclid(60));
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = if hour > 12 { hour - 12 } else { hour };
    format!("{}:{:02} {}", display_hour, minutes, period)
}

/// `0.25` -> `"15 min"`, `1.0` -> `"1 hr"`, `1.5` -> `"1.5 hrs"`.
pub fn duration_text(duration: f64) -> String {
    if duration == 1.0 {
        "1 hr".to_string()
    } else if duration < 1.0 {
        format!("{} min", (duration * 60.0).round() as i64)
    } else {
        format!("{} hrs", duration)
    }
}
