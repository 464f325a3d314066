use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{self, SLOT_HOURS};

/// Numeric ids are assigned locally; string keys come from a document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Num(u64),
    Key(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Num(n) => write!(f, "{}", n),
            EventId::Key(k) => f.write_str(k),
        }
    }
}

impl From<u64> for EventId {
    fn from(n: u64) -> Self {
        EventId::Num(n)
    }
}

impl From<&str> for EventId {
    fn from(k: &str) -> Self {
        EventId::Key(k.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    BiWeekly,
    Monthly,
    Other(String),
}

impl Frequency {
    pub const CHOICES: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::BiWeekly,
        Frequency::Monthly,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "Daily" => Frequency::Daily,
            "Weekly" => Frequency::Weekly,
            "Bi-weekly" => Frequency::BiWeekly,
            "Monthly" => Frequency::Monthly,
            other => Frequency::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::BiWeekly => "Bi-weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Other(s) => s,
        }
    }

    /// Next entry in [`Frequency::CHOICES`], wrapping around.
    pub fn cycle(&self) -> Self {
        let pos = Self::CHOICES.iter().position(|f| f == self);
        match pos {
            Some(i) => Self::CHOICES[(i + 1) % Self::CHOICES.len()].clone(),
            None => Frequency::Daily,
        }
    }
}

impl Serialize for Frequency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Frequency::parse(&s))
    }
}

/// One concrete occurrence on the sprint grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub team_id: String,
    pub title: String,
    pub day_index: usize,
    pub start_time: f64,
    pub duration: f64,
    pub frequency: Frequency,
}

impl Event {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Half-open interval intersection; touching intervals do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        !(self.start_time >= other.end_time() || self.end_time() <= other.start_time)
    }

    pub fn starts_at(&self, time_slot: f64) -> bool {
        self.start_time == time_slot
    }

    /// True for every slot the event occupies, not just its first.
    pub fn is_active_during(&self, time_slot: f64) -> bool {
        self.start_time < time_slot + SLOT_HOURS && self.end_time() > time_slot
    }

    pub fn time_range_display(&self) -> String {
        format!(
            "{} - {}",
            grid::format_time(self.start_time),
            grid::format_time(self.end_time())
        )
    }

    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(team_id) = patch.team_id {
            self.team_id = team_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(day_index) = patch.day_index {
            self.day_index = day_index;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
    }
}

/// An event before the store has given it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub team_id: String,
    pub title: String,
    pub day_index: usize,
    pub start_time: f64,
    pub duration: f64,
    pub frequency: Frequency,
}

impl NewEvent {
    pub fn with_id(self, id: EventId) -> Event {
        Event {
            id,
            team_id: self.team_id,
            title: self.title,
            day_index: self.day_index,
            start_time: self.start_time,
            duration: self.duration,
            frequency: self.frequency,
        }
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub team_id: Option<String>,
    pub title: Option<String>,
    pub day_index: Option<usize>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub frequency: Option<Frequency>,
}

impl EventPatch {
    /// The patch a drag-and-drop produces.
    pub fn moved_to(day_index: usize, start_time: f64) -> Self {
        Self {
            day_index: Some(day_index),
            start_time: Some(start_time),
            ..Self::default()
        }
    }
}
