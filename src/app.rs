use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::calendar::grid::{self, Week, DAYS_PER_WEEK, DAY_COUNT, SLOT_COUNT};
use crate::calendar::{
    layout, slot, Event, EventId, EventPatch, EventStore, Persistence, Placement, StoreError,
    TeamDirectory, TeamFilter, TeamStore,
};
use crate::components::event_form::EventFormState;
use crate::components::team_form::TeamFormState;
use crate::components::week_view::GridGeometry;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Teams,
    Confirm,
}

/// A destructive action waiting for y/n.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    DeleteEvent { id: EventId, title: String },
    ResetEvents,
    ResetTeams,
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::DeleteEvent { title, .. } => format!("Delete '{}'?", title),
            Confirm::ResetEvents => "Replace all events with the default schedule?".to_string(),
            Confirm::ResetTeams => "Reset team names and colors?".to_string(),
        }
    }
}

pub struct App<P> {
    pub running: bool,
    pub week: Week,
    /// Display day (0 = Monday) and slot under the cursor.
    pub cursor_day: usize,
    pub cursor_slot: usize,
    pub scroll: usize,
    pub input_mode: InputMode,
    pub form_state: Option<EventFormState>,
    pub team_form: Option<TeamFormState>,
    pub confirm: Option<Confirm>,
    pub detail: Option<EventId>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub filter: TeamFilter,
    /// Event being moved, by mouse drag or `m`.
    pub drag: Option<EventId>,
    /// Geometry of the last drawn grid, for mouse hit testing.
    pub grid: Option<GridGeometry>,
    pub today: Option<usize>,
    pub placements: HashMap<EventId, Placement>,
    selected: Option<EventId>,
    config: Config,
    events: EventStore<P>,
    teams: TeamStore<P>,
    changes: watch::Receiver<u64>,
}

impl<P: Persistence + Clone> App<P> {
    pub fn new(persistence: P, config: Config) -> Self {
        let events = EventStore::open(persistence.clone());
        let teams = TeamStore::open(persistence);
        let changes = events.subscribe();
        let today = config.day_index_of(Local::now().date_naive());

        let (cursor_day, week) = match today {
            Some(day) => grid::display_day(day),
            None => (0, config.start_week()),
        };
        let scroll = config.scroll_slot();

        let mut app = Self {
            running: true,
            week,
            cursor_day,
            cursor_slot: scroll,
            scroll,
            input_mode: InputMode::Normal,
            form_state: None,
            team_form: None,
            confirm: None,
            detail: None,
            show_help: false,
            status_message: None,
            filter: TeamFilter::default(),
            drag: None,
            grid: None,
            today,
            placements: HashMap::new(),
            selected: None,
            config,
            events,
            teams,
            changes,
        };
        app.relayout();
        app
    }
}

impl<P: Persistence> App<P> {
    pub fn events(&self) -> &[Event] {
        self.events.list()
    }

    pub fn teams(&self) -> &TeamDirectory {
        self.teams.directory()
    }

    /// Recompute placements if the event list changed since the last call.
    pub fn sync_layout(&mut self) {
        if matches!(self.changes.has_changed(), Ok(false)) {
            return;
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        let revision = *self.changes.borrow_and_update();
        let events = self.events.list();
        self.placements = (0..DAY_COUNT)
            .flat_map(|day| layout::layout_day(events, day))
            .collect();
        debug!(revision, count = self.placements.len(), "layout recomputed");

        for id in [&mut self.selected, &mut self.detail, &mut self.drag] {
            if id.as_ref().is_some_and(|id| self.events.get(id).is_none()) {
                *id = None;
            }
        }
    }

    pub fn placement(&self, id: &EventId) -> Placement {
        self.placements.get(id).copied().unwrap_or(Placement::FULL)
    }

    pub fn cursor_day_index(&self) -> usize {
        grid::absolute_day(self.cursor_day, self.week)
    }

    pub fn week_dates(&self) -> [Option<NaiveDate>; DAYS_PER_WEEK] {
        let mut dates = [None; DAYS_PER_WEEK];
        for (display, date) in dates.iter_mut().enumerate() {
            *date = self.config.date_of(grid::absolute_day(display, self.week));
        }
        dates
    }

    // ── Navigation ──

    pub fn set_week(&mut self, week: Week) {
        if self.week != week {
            self.week = week;
            self.selected = None;
        }
    }

    pub fn toggle_week(&mut self) {
        self.set_week(self.week.other());
    }

    /// Move one day left or right, crossing into the other week at the edges.
    pub fn move_day(&mut self, forward: bool) {
        let day = self.cursor_day_index();
        let target = if forward {
            (day + 1).min(DAY_COUNT - 1)
        } else {
            day.saturating_sub(1)
        };
        let (display, week) = grid::display_day(target);
        self.cursor_day = display;
        self.set_week(week);
        self.selected = None;
    }

    pub fn move_slot(&mut self, delta: isize) {
        self.cursor_slot = self
            .cursor_slot
            .saturating_add_signed(delta)
            .min(SLOT_COUNT - 1);
        self.selected = None;
        self.ensure_cursor_visible();
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let rows = self.visible_rows();
        let max = SLOT_COUNT.saturating_sub(rows);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    fn visible_rows(&self) -> usize {
        self.grid.as_ref().map_or(SLOT_COUNT, |g| g.rows.max(1))
    }

    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.visible_rows();
        if self.cursor_slot < self.scroll {
            self.scroll = self.cursor_slot;
        } else if self.cursor_slot >= self.scroll + rows {
            self.scroll = self.cursor_slot + 1 - rows;
        }
    }

    fn set_cursor(&mut self, display_day: usize, slot: usize) {
        if (display_day, slot) != (self.cursor_day, self.cursor_slot) {
            self.selected = None;
        }
        self.cursor_day = display_day.min(DAYS_PER_WEEK - 1);
        self.cursor_slot = slot.min(SLOT_COUNT - 1);
    }

    // ── Selection ──

    /// Visible events occupying the cursor cell, left to right.
    fn events_under_cursor(&self) -> Vec<&Event> {
        let mut found = slot::events_active_during(
            self.cursor_day,
            grid::slot_time(self.cursor_slot),
            self.week,
            self.events.list(),
            self.teams.directory(),
            &self.filter,
        );
        found.sort_by(|a, b| {
            self.placement(&a.id)
                .left_percent
                .total_cmp(&self.placement(&b.id).left_percent)
        });
        found
    }

    pub fn event_at_cursor(&self) -> Option<&Event> {
        let under = self.events_under_cursor();
        match &self.selected {
            Some(id) => under
                .iter()
                .find(|e| &e.id == id)
                .or(under.first())
                .copied(),
            None => under.first().copied(),
        }
    }

    pub fn selected_id(&self) -> Option<&EventId> {
        self.event_at_cursor().map(|e| &e.id)
    }

    /// Step the selection to the next event sharing the cursor cell.
    pub fn cycle_selection(&mut self) {
        let under = self.events_under_cursor();
        if under.is_empty() {
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|id| under.iter().position(|e| &e.id == id))
            .unwrap_or(0);
        let next = under[(current + 1) % under.len()].id.clone();
        self.selected = Some(next);
    }

    // ── Event form ──

    pub fn open_event_form(&mut self) {
        self.form_state = Some(EventFormState::new(
            self.cursor_day_index(),
            self.cursor_slot,
            self.teams.directory(),
        ));
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(event) = self.event_at_cursor() else {
            self.status_message = Some("No event here".to_string());
            return;
        };
        self.form_state = Some(EventFormState::for_event(event, self.teams.directory()));
        self.input_mode = InputMode::Form;
    }

    pub fn close_event_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn form_next_field(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.active_field = form.active_field.next();
        }
    }

    pub fn form_prev_field(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.active_field = form.active_field.prev();
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.backspace();
        }
    }

    pub fn form_adjust(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form_state {
            form.adjust(forward);
        }
    }

    pub fn submit_event_form(&mut self) {
        let Some(form) = self.form_state.take() else {
            return;
        };
        if !form.is_valid() {
            self.status_message = Some("Title is required".to_string());
            self.form_state = Some(form);
            return;
        }
        self.input_mode = InputMode::Normal;

        let result = match &form.editing {
            Some(id) => self.events.update(id, form.to_patch()).map(|updated| match updated {
                Some(e) => format!("Saved '{}'", e.title),
                None => "Event no longer exists".to_string(),
            }),
            None => self.events.create(form.to_new_event()).map(|added| match added.len() {
                1 => format!("Added '{}'", form.title.trim()),
                n => format!("Added '{}' x{}", form.title.trim(), n),
            }),
        };
        self.report(result);
    }

    // ── Confirmation ──

    pub fn request_delete(&mut self) {
        let Some(event) = self.event_at_cursor() else {
            self.status_message = Some("No event here".to_string());
            return;
        };
        self.confirm = Some(Confirm::DeleteEvent {
            id: event.id.clone(),
            title: event.title.clone(),
        });
        self.input_mode = InputMode::Confirm;
    }

    pub fn request_reset_events(&mut self) {
        self.confirm = Some(Confirm::ResetEvents);
        self.input_mode = InputMode::Confirm;
    }

    pub fn request_reset_teams(&mut self) {
        self.confirm = Some(Confirm::ResetTeams);
        self.input_mode = InputMode::Confirm;
    }

    pub fn answer_confirm(&mut self, yes: bool) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        self.input_mode = if self.team_form.is_some() {
            InputMode::Teams
        } else {
            InputMode::Normal
        };
        if !yes {
            return;
        }
        let result = match confirm {
            Confirm::DeleteEvent { id, title } => self.events.remove(&id).map(|removed| {
                if removed {
                    format!("Deleted '{}'", title)
                } else {
                    "Event no longer exists".to_string()
                }
            }),
            Confirm::ResetEvents => self
                .events
                .reset_to_defaults()
                .map(|_| "Events reset to defaults".to_string()),
            Confirm::ResetTeams => {
                let result = self
                    .teams
                    .reset()
                    .map(|_| "Teams reset to defaults".to_string());
                if self.team_form.is_some() {
                    self.team_form = Some(TeamFormState::new(self.teams.directory()));
                }
                result
            }
        };
        self.report(result);
    }

    // ── Drag and drop ──

    pub fn pick_up(&mut self) {
        let Some(event) = self.event_at_cursor() else {
            self.status_message = Some("No event here".to_string());
            return;
        };
        let (id, msg) = (event.id.clone(), format!("Moving '{}'", event.title));
        debug!(%id, "picked up");
        self.status_message = Some(msg);
        self.drag = Some(id);
    }

    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            self.status_message = Some("Move cancelled".to_string());
        }
    }

    /// Drop the dragged event on the cursor cell.
    pub fn drop_at_cursor(&mut self) {
        let Some(id) = self.drag.take() else {
            return;
        };
        let day_index = self.cursor_day_index();
        let start_time = grid::slot_time(self.cursor_slot);
        let Some(event) = self.events.get(&id) else {
            return;
        };
        if event.day_index == day_index && event.start_time == start_time {
            return;
        }
        let result = self
            .events
            .update(&id, EventPatch::moved_to(day_index, start_time))
            .map(|updated| match updated {
                Some(e) => format!(
                    "Moved '{}' to {} {}",
                    e.title,
                    grid::day_label(e.day_index),
                    grid::format_time(e.start_time)
                ),
                None => "Event no longer exists".to_string(),
            });
        self.selected = Some(id);
        self.report(result);
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-1),
            MouseEventKind::ScrollDown => self.scroll_by(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((day, slot)) = self.hit(mouse.column, mouse.row) else {
                    return;
                };
                self.set_cursor(day, slot);
                if self.drag.is_some() {
                    self.drop_at_cursor();
                } else if let Some(event) = self.event_at_cursor() {
                    self.drag = Some(event.id.clone());
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((day, slot)) = self.hit(mouse.column, mouse.row) {
                    self.cursor_day = day;
                    self.cursor_slot = slot;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some((day, slot)) = self.hit(mouse.column, mouse.row) {
                    self.cursor_day = day;
                    self.cursor_slot = slot;
                }
                self.drop_at_cursor();
            }
            _ => {}
        }
    }

    fn hit(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        self.grid.as_ref()?.hit(x, y)
    }

    // ── Filter ──

    /// Toggle the `n`th legend entry (1-based) in the team filter.
    pub fn toggle_team_filter(&mut self, n: usize) {
        let Some(name) = n
            .checked_sub(1)
            .and_then(|i| self.teams.directory().legend().get(i).map(|t| t.name.clone()))
        else {
            return;
        };
        self.filter.toggle(&name);
        self.selected = None;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    // ── Team settings ──

    pub fn open_team_settings(&mut self) {
        self.team_form = Some(TeamFormState::new(self.teams.directory()));
        self.input_mode = InputMode::Teams;
    }

    pub fn close_team_settings(&mut self) {
        self.team_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn team_select(&mut self, forward: bool) {
        if let Some(ref mut form) = self.team_form {
            form.select(forward, self.teams.directory());
        }
    }

    pub fn team_toggle_field(&mut self) {
        if let Some(ref mut form) = self.team_form {
            form.toggle_field();
        }
    }

    pub fn team_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.team_form {
            form.input_char(c);
        }
    }

    pub fn team_backspace(&mut self) {
        if let Some(ref mut form) = self.team_form {
            form.backspace();
        }
    }

    pub fn submit_team_form(&mut self) {
        let Some(form) = self.team_form.as_ref() else {
            return;
        };
        if !form.is_valid() {
            self.status_message = Some("Name and a valid color are required".to_string());
            return;
        }
        let Some(id) = form.team_id().map(str::to_string) else {
            return;
        };
        let patch = form.to_patch();
        let result = self.teams.update(&id, patch).map(|updated| {
            if updated {
                "Team saved".to_string()
            } else {
                "Team no longer exists".to_string()
            }
        });
        if let Some(ref mut form) = self.team_form {
            form.load(self.teams.directory());
        }
        self.report(result);
    }

    // ── Detail ──

    pub fn show_detail(&mut self) {
        self.detail = self.event_at_cursor().map(|e| e.id.clone());
        if self.detail.is_none() {
            self.status_message = Some("No event here".to_string());
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_event(&self) -> Option<&Event> {
        self.events.get(self.detail.as_ref()?)
    }

    fn report(&mut self, result: Result<String, StoreError>) {
        self.status_message = Some(match result {
            Ok(msg) => msg,
            Err(e) => {
                error!(error = %e, "change not saved");
                format!("Not saved: {}", e)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::calendar::persist::MemoryStore;
    use crate::calendar::{defaults, Frequency};
    use crate::components::event_form::FormField;

    fn app() -> (App<Rc<MemoryStore>>, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let mut app = App::new(store.clone(), Config::default());
        // Pin the cursor regardless of today's date.
        app.week = Week::One;
        app.cursor_day = 0;
        app.cursor_slot = 0;
        (app, store)
    }

    fn point_at(app: &mut App<Rc<MemoryStore>>, day_index: usize, time: f64) {
        let (display, week) = grid::display_day(day_index);
        app.week = week;
        app.cursor_day = display;
        app.cursor_slot = grid::slot_at_or_before(time);
        app.selected = None;
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn starts_on_seed_with_layout() {
        let (app, store) = app();
        assert_eq!(app.events().len(), defaults::events().len());
        assert_eq!(app.placements.len(), app.events().len());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn crossing_friday_switches_week() {
        let (mut app, _) = app();
        app.cursor_day = 4;
        app.move_day(true);
        assert_eq!(app.week, Week::Two);
        assert_eq!(app.cursor_day, 0);
        app.move_day(false);
        assert_eq!((app.week, app.cursor_day), (Week::One, 4));

        point_at(&mut app, DAY_COUNT - 1, 9.0);
        app.move_day(true);
        assert_eq!(app.cursor_day_index(), DAY_COUNT - 1);
    }

    #[test]
    fn cursor_keeps_scroll_in_view() {
        let (mut app, _) = app();
        app.grid = Some(GridGeometry {
            body_top: 2,
            rows: 10,
            first_slot: 0,
            columns: [(10, 8), (18, 8), (26, 8), (34, 8), (42, 8)],
        });
        app.scroll = 0;
        app.move_slot(12);
        assert_eq!(app.cursor_slot, 12);
        assert_eq!(app.scroll, 3);
        app.move_slot(-100);
        assert_eq!(app.cursor_slot, 0);
        assert_eq!(app.scroll, 0);
        app.move_slot(1000);
        assert_eq!(app.cursor_slot, SLOT_COUNT - 1);
        app.scroll_by(100);
        assert_eq!(app.scroll, SLOT_COUNT - 10);
    }

    #[test]
    fn new_daily_event_adds_ten_rows_in_one_write() {
        let (mut app, store) = app();
        let before = app.events().len();
        point_at(&mut app, 2, 15.0);
        app.open_event_form();
        assert_eq!(app.input_mode, InputMode::Form);
        for c in "Sync".chars() {
            app.form_input_char(c);
        }
        if let Some(ref mut form) = app.form_state {
            form.frequency = Frequency::Daily;
        }
        app.submit_event_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.events().len(), before + 10);
        assert_eq!(store.writes(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Added 'Sync' x10"));

        app.sync_layout();
        assert_eq!(app.placements.len(), app.events().len());
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let (mut app, store) = app();
        app.open_event_form();
        app.submit_event_form();
        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.form_state.is_some());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn edit_form_updates_single_occurrence() {
        let (mut app, _) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        app.open_edit_form();
        let form = app.form_state.as_mut().expect("edit form");
        assert_eq!(form.editing.as_ref(), Some(&target.id));
        form.title = "Renamed".into();
        form.active_field = FormField::Duration;
        app.form_adjust(true);
        app.submit_event_form();

        let edited = app.events().iter().find(|e| e.id == target.id).expect("still there");
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.duration, (target.duration + 0.25).min(3.0));
        assert_eq!(app.events().len(), defaults::events().len());
    }

    #[test]
    fn delete_needs_confirmation() {
        let (mut app, _) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);

        app.request_delete();
        assert_eq!(app.input_mode, InputMode::Confirm);
        app.answer_confirm(false);
        assert!(app.events().iter().any(|e| e.id == target.id));

        app.request_delete();
        app.answer_confirm(true);
        assert!(!app.events().iter().any(|e| e.id == target.id));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn keyboard_move_updates_day_and_start() {
        let (mut app, store) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        app.pick_up();
        assert_eq!(app.drag.as_ref(), Some(&target.id));
        assert_eq!(app.status_message, Some(format!("Moving '{}'", target.title)));

        point_at(&mut app, 7, 16.0);
        app.drop_at_cursor();
        let moved = app.events().iter().find(|e| e.id == target.id).expect("moved");
        assert_eq!((moved.day_index, moved.start_time), (7, 16.0));
        assert_eq!(moved.duration, target.duration);
        assert_eq!(store.writes(), 1);
        assert!(app.drag.is_none());
    }

    #[test]
    fn cancelled_move_changes_nothing() {
        let (mut app, store) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        app.pick_up();
        app.move_slot(4);
        app.cancel_drag();
        app.drop_at_cursor();
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn mouse_drag_moves_event() {
        let (mut app, store) = app();
        let geo = GridGeometry {
            body_top: 2,
            rows: SLOT_COUNT,
            first_slot: 0,
            columns: [(10, 8), (18, 8), (26, 8), (34, 8), (42, 8)],
        };
        app.grid = Some(geo);

        let target = app
            .events()
            .iter()
            .find(|e| e.day_index < DAYS_PER_WEEK)
            .cloned()
            .expect("week one event");
        let slot = grid::slot_index(target.start_time).expect("on grid");
        let (cx, _) = app.grid.as_ref().map(|g| g.columns[target.day_index]).unwrap_or_default();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), cx + 1, 2 + slot as u16));
        assert_eq!(app.drag.as_ref(), Some(&target.id));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 43, 2));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 43, 2));

        let moved = app.events().iter().find(|e| e.id == target.id).expect("moved");
        assert_eq!((moved.day_index, moved.start_time), (4, grid::DAY_START));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn click_without_moving_does_not_write() {
        let (mut app, store) = app();
        app.grid = Some(GridGeometry {
            body_top: 2,
            rows: SLOT_COUNT,
            first_slot: 0,
            columns: [(10, 8), (18, 8), (26, 8), (34, 8), (42, 8)],
        });
        let target = app.events().iter().find(|e| e.day_index == 0).cloned().expect("monday event");
        let row = 2 + grid::slot_index(target.start_time).expect("on grid") as u16;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 11, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 11, row));
        assert_eq!(store.writes(), 0);
        assert!(app.drag.is_none());
    }

    #[test]
    fn failed_write_keeps_change_and_reports() {
        let (mut app, store) = app();
        store.set_failing(true);
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        app.request_delete();
        app.answer_confirm(true);
        assert!(!app.events().iter().any(|e| e.id == target.id));
        let msg = app.status_message.clone().unwrap_or_default();
        assert!(msg.starts_with("Not saved"), "{msg}");
    }

    #[test]
    fn filter_hides_events_from_cursor() {
        let (mut app, _) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        let team_name = app.teams().resolve(&target.team_id).name.clone();
        let position = app
            .teams()
            .legend()
            .iter()
            .position(|t| t.name == team_name)
            .expect("team in legend");
        let other = if position == 0 { 2 } else { 1 };

        app.toggle_team_filter(other);
        assert!(app.event_at_cursor().is_none());
        app.toggle_team_filter(position + 1);
        assert!(app.event_at_cursor().is_some());
        app.clear_filter();
        assert!(app.filter.is_empty());
        app.toggle_team_filter(0);
        app.toggle_team_filter(99);
        assert!(app.filter.is_empty());
    }

    #[test]
    fn tab_cycles_overlapping_events() {
        let (mut app, _) = app();
        let target = app.events()[0].clone();
        let mut draft_form = EventFormState::for_event(&target, app.teams());
        draft_form.editing = None;
        draft_form.title = "Clash".into();
        draft_form.frequency = Frequency::BiWeekly;
        app.form_state = Some(draft_form);
        app.input_mode = InputMode::Form;
        app.submit_event_form();
        app.sync_layout();

        point_at(&mut app, target.day_index, target.start_time);
        let first = app.selected_id().cloned();
        app.cycle_selection();
        let second = app.selected_id().cloned();
        assert_ne!(first, second);
        app.cycle_selection();
        assert_eq!(app.selected_id().cloned(), first);
    }

    #[test]
    fn team_settings_edit_and_reset() {
        let (mut app, store) = app();
        app.open_team_settings();
        assert_eq!(app.input_mode, InputMode::Teams);
        let id = app
            .team_form
            .as_ref()
            .and_then(|f| f.team_id())
            .map(str::to_string)
            .expect("a team");
        if let Some(ref mut form) = app.team_form {
            form.name = "Platform".into();
        }
        app.submit_team_form();
        assert_eq!(app.teams().resolve(&id).name, "Platform");
        assert!(store.writes() >= 1);

        app.request_reset_teams();
        app.answer_confirm(true);
        assert_eq!(app.input_mode, InputMode::Teams);
        assert_ne!(app.teams().resolve(&id).name, "Platform");
        app.close_team_settings();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn reset_events_restores_seed() {
        let (mut app, _) = app();
        let target = app.events()[0].clone();
        point_at(&mut app, target.day_index, target.start_time);
        app.show_detail();
        assert_eq!(app.detail_event().map(|e| &e.id), Some(&target.id));
        app.request_delete();
        app.answer_confirm(true);
        app.sync_layout();
        assert!(app.detail.is_none());

        app.request_reset_events();
        app.answer_confirm(true);
        assert_eq!(app.events().len(), defaults::events().len());
    }
}
