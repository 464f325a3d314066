use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Deserialize;
use thiserror::Error;

use crate::calendar::grid::{self, Week, DAYS_PER_WEEK, DAY_COUNT};
use crate::theme::ThemeConfig;

const APP_DIR: &str = "sprint-calendar";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("start_week must be 1 or 2, got {0}")]
    StartWeek(u8),

    #[error("sprint_start must be a Monday, got {0} ({1})")]
    SprintStart(NaiveDate, Weekday),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub start_week: u8,
    /// Decimal hour shown at the top of the grid on launch.
    pub scroll_to: f64,
    /// Monday of sprint week 1. Enables calendar dates in the day headers.
    pub sprint_start: Option<NaiveDate>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            start_week: 1,
            scroll_to: grid::slot_time(grid::DEFAULT_SCROLL_SLOT),
            sprint_start: None,
            log_file: None,
            log_level: "info".to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the user config dir when `path` is `None`.
    /// Only the implicit location is allowed to be missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ParseFailure::Toml(source) => ConfigError::Parse { path, source },
            ParseFailure::Invalid(e) => e,
        })
    }

    fn parse(content: &str) -> Result<Self, ParseFailure> {
        let config: Config = toml::from_str(content).map_err(ParseFailure::Toml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if Week::from_number(self.start_week).is_none() {
            return Err(ConfigError::StartWeek(self.start_week));
        }
        if let Some(date) = self.sprint_start {
            if date.weekday() != Weekday::Mon {
                return Err(ConfigError::SprintStart(date, date.weekday()));
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("sprint-calendar.log"))
    }

    pub fn start_week(&self) -> Week {
        Week::from_number(self.start_week).unwrap_or_default()
    }

    pub fn scroll_slot(&self) -> usize {
        grid::slot_at_or_before(self.scroll_to)
    }

    /// Calendar date of a grid day, when a sprint start is configured.
    pub fn date_of(&self, day_index: usize) -> Option<NaiveDate> {
        let start = self.sprint_start?;
        let week = (day_index / DAYS_PER_WEEK) as i64;
        let weekday = (day_index % DAYS_PER_WEEK) as i64;
        Some(start + Duration::days(week * 7 + weekday))
    }

    /// Grid day for a calendar date, if it falls on a sprint weekday.
    pub fn day_index_of(&self, date: NaiveDate) -> Option<usize> {
        (0..DAY_COUNT).find(|&d| self.date_of(d) == Some(date))
    }
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}
