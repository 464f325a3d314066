use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::defaults;
use super::event::{Event, EventId, EventPatch, NewEvent};
use super::persist::{PersistError, PersistResult, Persistence};
use super::recurrence;
use super::team::{TeamDirectory, TeamPatch};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The change is applied in memory but could not be written out.
    #[error("{rows} row(s) kept in memory only: {source}")]
    NotPersisted {
        rows: usize,
        #[source]
        source: PersistError,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The event list. Mutations land in memory first, then subscribers are
/// notified, then the snapshot is written out.
pub struct EventStore<P> {
    events: Vec<Event>,
    persistence: P,
    revision: watch::Sender<u64>,
}

impl<P: Persistence> EventStore<P> {
    /// Load saved events, or start from the default schedule.
    pub fn open(persistence: P) -> Self {
        let events = match persistence.load_events() {
            Ok(Some(events)) => {
                info!(count = events.len(), "loaded saved events");
                events
            }
            Ok(None) => defaults::events(),
            Err(e) => {
                warn!(error = %e, "could not load saved events, using defaults");
                log_set_aside("events", persistence.set_aside_events());
                defaults::events()
            }
        };
        let (revision, _) = watch::channel(0);
        Self {
            events,
            persistence,
            revision,
        }
    }

    pub fn list(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Receiver whose value is bumped on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn next_id(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|e| match e.id {
                EventId::Num(n) => Some(n),
                EventId::Key(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn add(&mut self, draft: NewEvent) -> StoreResult<Event> {
        let event = draft.with_id(EventId::Num(self.next_id()));
        info!(id = %event.id, day = event.day_index, start = event.start_time, "event added");
        self.events.push(event.clone());
        self.commit(1)?;
        Ok(event)
    }

    /// Add several rows as one change: a single notification and a single
    /// snapshot write, so either all rows are saved or none are.
    pub fn add_batch(&mut self, drafts: Vec<NewEvent>) -> StoreResult<Vec<Event>> {
        let first = self.next_id();
        let added: Vec<Event> = drafts
            .into_iter()
            .zip(first..)
            .map(|(draft, id)| draft.with_id(EventId::Num(id)))
            .collect();
        info!(count = added.len(), first_id = first, "event batch added");
        self.events.extend(added.iter().cloned());
        self.commit(added.len())?;
        Ok(added)
    }

    /// Expand `draft` by its frequency and add the resulting rows.
    pub fn create(&mut self, draft: NewEvent) -> StoreResult<Vec<Event>> {
        let mut rows = recurrence::expand(draft);
        if rows.len() == 1 {
            let row = rows.remove(0);
            return self.add(row).map(|e| vec![e]);
        }
        self.add_batch(rows)
    }

    /// `Ok(None)` if no event has this id.
    pub fn update(&mut self, id: &EventId, patch: EventPatch) -> StoreResult<Option<Event>> {
        let Some(event) = self.events.iter_mut().find(|e| &e.id == id) else {
            debug!(%id, "update for unknown event ignored");
            return Ok(None);
        };
        event.apply(patch);
        let updated = event.clone();
        info!(%id, day = updated.day_index, start = updated.start_time, "event updated");
        self.commit(1)?;
        Ok(Some(updated))
    }

    /// Removing an unknown id is a no-op and returns `Ok(false)`.
    pub fn remove(&mut self, id: &EventId) -> StoreResult<bool> {
        let before = self.events.len();
        self.events.retain(|e| &e.id != id);
        if self.events.len() == before {
            return Ok(false);
        }
        info!(%id, "event removed");
        self.commit(1)?;
        Ok(true)
    }

    pub fn reset_to_defaults(&mut self) -> StoreResult<()> {
        self.events = defaults::events();
        info!(count = self.events.len(), "events reset to defaults");
        self.commit(self.events.len())
    }

    fn commit(&mut self, rows: usize) -> StoreResult<()> {
        self.revision.send_modify(|rev| *rev += 1);
        self.persistence.save_events(&self.events).map_err(|source| {
            warn!(error = %source, rows, "event change not persisted");
            StoreError::NotPersisted { rows, source }
        })
    }
}

fn log_set_aside(what: &str, result: PersistResult<Option<PathBuf>>) {
    match result {
        Ok(Some(path)) => warn!(what, backup = %path.display(), "unreadable snapshot moved aside"),
        Ok(None) => {}
        Err(e) => error!(what, error = %e, "could not move unreadable snapshot aside"),
    }
}

/// Team directory plus its persistence.
pub struct TeamStore<P> {
    directory: TeamDirectory,
    persistence: P,
}

impl<P: Persistence> TeamStore<P> {
    pub fn open(persistence: P) -> Self {
        let directory = match persistence.load_teams() {
            Ok(Some(map)) => TeamDirectory::from_map(map),
            Ok(None) => TeamDirectory::default(),
            Err(e) => {
                warn!(error = %e, "could not load saved teams, using defaults");
                log_set_aside("teams", persistence.set_aside_teams());
                TeamDirectory::default()
            }
        };
        Self {
            directory,
            persistence,
        }
    }

    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    pub fn update(&mut self, id: &str, patch: TeamPatch) -> StoreResult<bool> {
        if !self.directory.update(id, patch) {
            return Ok(false);
        }
        info!(team = id, "team updated");
        self.save()?;
        Ok(true)
    }

    pub fn reset(&mut self) -> StoreResult<()> {
        self.directory.reset();
        info!("teams reset to defaults");
        self.save()
    }

    fn save(&self) -> StoreResult<()> {
        self.persistence
            .save_teams(&self.directory.to_map())
            .map_err(|source| {
                warn!(error = %source, "team change not persisted");
                StoreError::NotPersisted { rows: 1, source }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::Frequency;
    use crate::calendar::persist::{JsonFileStore, MemoryStore};

    fn draft(day_index: usize, frequency: Frequency) -> NewEvent {
        NewEvent {
            team_id: "teamB".into(),
            title: "Backlog Refinement".into(),
            day_index,
            start_time: 13.0,
            duration: 1.0,
            frequency,
        }
    }

    #[test]
    fn starts_from_defaults_when_nothing_saved() {
        let backend = MemoryStore::new();
        let store = EventStore::open(&backend);
        assert_eq!(store.list(), defaults::events().as_slice());
    }

    #[test]
    fn ids_continue_after_the_highest_numeric_id() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        let event = store.add(draft(0, Frequency::BiWeekly)).unwrap();
        assert_eq!(event.id, EventId::Num(208));
        assert_eq!(backend.saved_events().unwrap().len(), defaults::events().len() + 1);
    }

    #[test]
    fn daily_creation_is_one_batch_write() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        let mut rx = store.subscribe();

        let rows = store.create(draft(2, Frequency::Daily)).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(backend.writes(), 1);
        assert_eq!(store.revision(), 1);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());

        let ids: Vec<EventId> = rows.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.first(), Some(&EventId::Num(208)));
        assert_eq!(ids.last(), Some(&EventId::Num(217)));
    }

    #[test]
    fn weekly_creation_lands_in_both_weeks() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        let rows = store.create(draft(3, Frequency::Weekly)).unwrap();
        assert_eq!(rows.iter().map(|r| r.day_index).collect::<Vec<_>>(), vec![3, 8]);
    }

    #[test]
    fn failed_batch_reports_once_and_keeps_memory() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        backend.set_failing(true);

        let err = store.create(draft(0, Frequency::Daily)).unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted { rows: 10, .. }));
        assert_eq!(store.list().len(), defaults::events().len() + 10);
        assert!(backend.saved_events().is_none());
    }

    #[test]
    fn drag_move_updates_one_occurrence() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        let rows = store.create(draft(1, Frequency::Weekly)).unwrap();

        let moved = store
            .update(&rows[0].id, EventPatch::moved_to(4, 15.5))
            .unwrap()
            .unwrap();
        assert_eq!((moved.day_index, moved.start_time), (4, 15.5));
        let sibling = store.get(&rows[1].id).unwrap();
        assert_eq!((sibling.day_index, sibling.start_time), (6, 13.0));

        assert!(store.update(&EventId::Num(9999), EventPatch::default()).unwrap().is_none());
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        assert!(!store.remove(&EventId::Key("missing".into())).unwrap());
        assert_eq!(backend.writes(), 0);
        assert!(store.remove(&EventId::Num(1)).unwrap());
        assert!(store.get(&EventId::Num(1)).is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let backend = MemoryStore::new();
        let mut store = EventStore::open(&backend);
        store.create(draft(0, Frequency::Daily)).unwrap();
        store.remove(&EventId::Num(5)).unwrap();

        store.reset_to_defaults().unwrap();
        let first = serde_json::to_string(store.list()).unwrap();
        store.reset_to_defaults().unwrap();
        let second = serde_json::to_string(store.list()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.list(), defaults::events().as_slice());
    }

    #[test]
    fn corrupt_event_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.json"), "[{").unwrap();
        let store = EventStore::open(JsonFileStore::new(dir.path()));
        assert_eq!(store.list().len(), defaults::events().len());
    }

    #[test]
    fn unreadable_rows_are_kept_in_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let original = r#"[
            {"id":1,"teamId":"teamA","title":"Mine","dayIndex":0,"startTime":8.0,"duration":0.5,"frequency":"Weekly"},
            {"id":2,"teamId":"teamA","title":"Broken","dayIndex":-1,"startTime":8.0,"duration":0.5,"frequency":"Weekly"}
        ]"#;
        std::fs::write(dir.path().join("events.json"), original).unwrap();

        let mut store = EventStore::open(JsonFileStore::new(dir.path()));
        assert_eq!(store.list(), defaults::events().as_slice());
        store.add(draft(0, Frequency::BiWeekly)).unwrap();

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("events.json.corrupt"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), original);
    }

    #[test]
    fn unreadable_teams_file_is_kept_in_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("teams.json"), "{ teamA").unwrap();

        let mut teams = TeamStore::open(JsonFileStore::new(dir.path()));
        teams.reset().unwrap();

        let kept = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .find(|p| p.to_string_lossy().contains("teams.json.corrupt"))
            .unwrap();
        assert_eq!(std::fs::read_to_string(kept).unwrap(), "{ teamA");
    }

    #[test]
    fn events_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EventStore::open(JsonFileStore::new(dir.path()));
        let added = store.add(draft(9, Frequency::Monthly)).unwrap();

        let reopened = EventStore::open(JsonFileStore::new(dir.path()));
        assert_eq!(reopened.get(&added.id), Some(&added));
    }

    #[test]
    fn team_edits_persist() {
        let backend = MemoryStore::new();
        let mut teams = TeamStore::open(&backend);
        assert!(teams
            .update("teamC", TeamPatch { name: Some("Platform".into()), ..Default::default() })
            .unwrap());
        assert!(!teams.update("nobody", TeamPatch::default()).unwrap());

        let mut reopened = TeamStore::open(&backend);
        assert_eq!(reopened.directory().resolve("teamC").name, "Platform");

        reopened.reset().unwrap();
        assert_eq!(reopened.directory().resolve("teamC").name, "Team C");
    }
}
