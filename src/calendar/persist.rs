//! Durable storage for events and teams.
//!
//! Backends write whole snapshots, so a batch of new events lands in one
//! write or not at all.

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Local;
use thiserror::Error;

use super::event::Event;
use super::team::Team;

const EVENTS_FILE: &str = "events.json";
const TEAMS_FILE: &str = "teams.json";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

pub trait Persistence {
    /// `Ok(None)` when nothing has been saved yet.
    fn load_events(&self) -> PersistResult<Option<Vec<Event>>>;
    fn save_events(&self, events: &[Event]) -> PersistResult<()>;
    fn load_teams(&self) -> PersistResult<Option<BTreeMap<String, Team>>>;
    fn save_teams(&self, teams: &BTreeMap<String, Team>) -> PersistResult<()>;

    /// Move an unreadable events snapshot out of the way so the next save
    /// cannot overwrite it. Returns where it went, if anywhere.
    fn set_aside_events(&self) -> PersistResult<Option<PathBuf>> {
        Ok(None)
    }

    fn set_aside_teams(&self) -> PersistResult<Option<PathBuf>> {
        Ok(None)
    }
}

/// JSON documents in a data directory, one file per collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: serde::de::DeserializeOwned>(&self, name: &str) -> PersistResult<Option<T>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PersistError::Json { path, source })
    }

    /// Rename `name` to a timestamped `.corrupt` sibling.
    fn set_aside(&self, name: &str) -> PersistResult<Option<PathBuf>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let backup = self.dir.join(format!("{}.corrupt-{}", name, stamp));
        fs::rename(&path, &backup).map_err(io_err(&path))?;
        Ok(Some(backup))
    }

    /// Write to a sibling temp file and rename over the target.
    fn write<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> PersistResult<()> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{}.tmp", name));
        let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError {
    let path = path.to_path_buf();
    move |source| PersistError::Io { path, source }
}

impl Persistence for JsonFileStore {
    fn load_events(&self) -> PersistResult<Option<Vec<Event>>> {
        self.read(EVENTS_FILE)
    }

    fn save_events(&self, events: &[Event]) -> PersistResult<()> {
        self.write(EVENTS_FILE, events)
    }

    fn load_teams(&self) -> PersistResult<Option<BTreeMap<String, Team>>> {
        self.read(TEAMS_FILE)
    }

    fn set_aside_events(&self) -> PersistResult<Option<PathBuf>> {
        self.set_aside(EVENTS_FILE)
    }

    fn set_aside_teams(&self) -> PersistResult<Option<PathBuf>> {
        self.set_aside(TEAMS_FILE)
    }

    fn save_teams(&self, teams: &BTreeMap<String, Team>) -> PersistResult<()> {
        self.write(TEAMS_FILE, teams)
    }
}

/// Keeps snapshots in memory. Writes can be switched off to simulate an
/// unreachable store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RefCell<Option<Vec<Event>>>,
    teams: RefCell<Option<BTreeMap<String, Team>>>,
    failing: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn saved_events(&self) -> Option<Vec<Event>> {
        self.events.borrow().clone()
    }

    fn check(&self) -> PersistResult<()> {
        if self.failing.get() {
            return Err(PersistError::Unavailable("memory store is set to fail".into()));
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_events(&self) -> PersistResult<Option<Vec<Event>>> {
        Ok(self.events.borrow().clone())
    }

    fn save_events(&self, events: &[Event]) -> PersistResult<()> {
        self.check()?;
        *self.events.borrow_mut() = Some(events.to_vec());
        Ok(())
    }

    fn load_teams(&self) -> PersistResult<Option<BTreeMap<String, Team>>> {
        Ok(self.teams.borrow().clone())
    }

    fn save_teams(&self, teams: &BTreeMap<String, Team>) -> PersistResult<()> {
        self.check()?;
        *self.teams.borrow_mut() = Some(teams.clone());
        Ok(())
    }
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn load_events(&self) -> PersistResult<Option<Vec<Event>>> {
        (**self).load_events()
    }

    fn save_events(&self, events: &[Event]) -> PersistResult<()> {
        (**self).save_events(events)
    }

    fn load_teams(&self) -> PersistResult<Option<BTreeMap<String, Team>>> {
        (**self).load_teams()
    }

    fn save_teams(&self, teams: &BTreeMap<String, Team>) -> PersistResult<()> {
        (**self).save_teams(teams)
    }

    fn set_aside_events(&self) -> PersistResult<Option<PathBuf>> {
        (**self).set_aside_events()
    }

    fn set_aside_teams(&self) -> PersistResult<Option<PathBuf>> {
        (**self).set_aside_teams()
    }
}

impl<P: Persistence + ?Sized> Persistence for Rc<P> {
    fn load_events(&self) -> PersistResult<Option<Vec<Event>>> {
        (**self).load_events()
    }

    fn save_events(&self, events: &[Event]) -> PersistResult<()> {
        (**self).save_events(events)
    }

    fn load_teams(&self) -> PersistResult<Option<BTreeMap<String, Team>>> {
        (**self).load_teams()
    }

    fn save_teams(&self, teams: &BTreeMap<String, Team>) -> PersistResult<()> {
        (**self).save_teams(teams)
    }

    fn set_aside_events(&self) -> PersistResult<Option<PathBuf>> {
        (**self).set_aside_events()
    }

    fn set_aside_teams(&self) -> PersistResult<Option<PathBuf>> {
        (**self).set_aside_teams()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{defaults, TeamDirectory};

    #[test]
    fn json_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        assert!(store.load_events().unwrap().is_none());
        assert!(store.load_teams().unwrap().is_none());

        let events = defaults::events();
        store.save_events(&events).unwrap();
        assert_eq!(store.load_events().unwrap(), Some(events));

        let teams = TeamDirectory::default().to_map();
        store.save_teams(&teams).unwrap();
        let loaded = store.load_teams().unwrap().unwrap();
        assert_eq!(loaded["teamA"].name, "Team A");
        assert!(!store.dir().join("events.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(EVENTS_FILE), "{ not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load_events(), Err(PersistError::Json { .. })));
    }

    #[test]
    fn unreadable_file_is_moved_aside_intact() {
        let dir = tempfile::tempdir().unwrap();
        let original = r#"[{"id":1,"teamId":"teamA","title":"Mine","dayIndex":-1}]"#;
        fs::write(dir.path().join(EVENTS_FILE), original).unwrap();
        let store = JsonFileStore::new(dir.path());

        let backup = store.set_aside_events().unwrap().unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);
        assert!(!dir.path().join(EVENTS_FILE).exists());
        assert!(store.set_aside_events().unwrap().is_none());
        assert!(store.set_aside_teams().unwrap().is_none());
    }

    #[test]
    fn memory_store_can_refuse_writes() {
        let store = MemoryStore::new();
        store.save_events(&[]).unwrap();
        store.set_failing(true);
        assert!(store.save_events(&defaults::events()).is_err());
        assert_eq!(store.saved_events(), Some(vec![]));
        assert_eq!(store.writes(), 1);
    }
}
