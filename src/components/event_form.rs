use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::grid::{self, DAY_COUNT, SLOT_COUNT, SLOT_HOURS};
use crate::calendar::{Event, EventId, EventPatch, Frequency, NewEvent, TeamDirectory};
use crate::theme;

const MIN_DURATION: f64 = 0.25;
const MAX_DURATION: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Team,
    Day,
    Start,
    Duration,
    Frequency,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Team,
            FormField::Team => FormField::Day,
            FormField::Day => FormField::Start,
            FormField::Start => FormField::Duration,
            FormField::Duration => FormField::Frequency,
            FormField::Frequency => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Frequency,
            FormField::Team => FormField::Title,
            FormField::Day => FormField::Team,
            FormField::Start => FormField::Day,
            FormField::Duration => FormField::Start,
            FormField::Frequency => FormField::Duration,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    /// `Some` when editing a single existing occurrence.
    pub editing: Option<EventId>,
    pub title: String,
    /// Team ids in legend order; `team_index` points into it.
    pub team_ids: Vec<String>,
    pub team_index: usize,
    pub day_index: usize,
    pub start_slot: usize,
    /// Start of the edited event as stored, kept until the Start field is
    /// changed so an off-grid time survives unrelated edits.
    pub exact_start: Option<f64>,
    pub duration: f64,
    pub frequency: Frequency,
    pub active_field: FormField,
}

impl EventFormState {
    pub fn new(day_index: usize, start_slot: usize, teams: &TeamDirectory) -> Self {
        Self {
            editing: None,
            title: String::new(),
            team_ids: teams.legend().iter().map(|t| t.id.clone()).collect(),
            team_index: 0,
            day_index,
            start_slot: start_slot.min(SLOT_COUNT - 1),
            duration: 1.0,
            frequency: Frequency::Weekly,
            exact_start: None,
            active_field: FormField::Title,
        }
    }

    pub fn for_event(event: &Event, teams: &TeamDirectory) -> Self {
        let mut state = Self::new(event.day_index.min(DAY_COUNT - 1), grid::slot_at_or_before(event.start_time), teams);
        state.editing = Some(event.id.clone());
        state.title = event.title.clone();
        state.team_index = state
            .team_ids
            .iter()
            .position(|id| *id == event.team_id)
            .unwrap_or(0);
        state.exact_start = Some(event.start_time);
        state.duration = event.duration;
        state.frequency = event.frequency.clone();
        state
    }

    pub fn team_id(&self) -> String {
        self.team_ids.get(self.team_index).cloned().unwrap_or_default()
    }

    pub fn start_time(&self) -> f64 {
        self.exact_start
            .unwrap_or_else(|| grid::slot_time(self.start_slot))
    }

    pub fn input_char(&mut self, c: char) {
        if self.active_field == FormField::Title {
            self.title.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.active_field == FormField::Title {
            self.title.pop();
        }
    }

    /// Step the active choice field forwards or backwards.
    pub fn adjust(&mut self, forward: bool) {
        match self.active_field {
            FormField::Title => {}
            FormField::Team => {
                let total = self.team_ids.len().max(1);
                self.team_index = step(self.team_index, total, forward);
            }
            FormField::Day => self.day_index = step(self.day_index, DAY_COUNT, forward),
            FormField::Start => {
                self.exact_start = None;
                self.start_slot = step(self.start_slot, SLOT_COUNT, forward);
            }
            FormField::Duration => {
                let delta = if forward { SLOT_HOURS } else { -SLOT_HOURS };
                self.duration = (self.duration + delta).clamp(MIN_DURATION, MAX_DURATION);
            }
            FormField::Frequency => {
                self.frequency = if forward {
                    self.frequency.cycle()
                } else {
                    (0..Frequency::CHOICES.len() - 1).fold(self.frequency.clone(), |f, _| f.cycle())
                };
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.team_ids.is_empty()
    }

    pub fn to_new_event(&self) -> NewEvent {
        NewEvent {
            team_id: self.team_id(),
            title: self.title.trim().to_string(),
            day_index: self.day_index,
            start_time: self.start_time(),
            duration: self.duration,
            frequency: self.frequency.clone(),
        }
    }

    pub fn to_patch(&self) -> EventPatch {
        EventPatch {
            team_id: Some(self.team_id()),
            title: Some(self.title.trim().to_string()),
            day_index: Some(self.day_index),
            start_time: Some(self.start_time()),
            duration: Some(self.duration),
            frequency: Some(self.frequency.clone()),
        }
    }
}

fn step(value: usize, total: usize, forward: bool) -> usize {
    if forward {
        (value + 1) % total
    } else {
        (value + total - 1) % total
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState, teams: &TeamDirectory) {
        let form_w = area.width.min(56).max(30);
        let form_h = area.height.min(12).max(10);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() { " Edit Event " } else { " New Event " };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // team
            Constraint::Length(1), // day
            Constraint::Length(1), // start
            Constraint::Length(1), // duration
            Constraint::Length(1), // frequency
            Constraint::Length(1),
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = |f: FormField| state.active_field == f;
        let team = teams.resolve(&state.team_id());

        render_field(frame, rows[0], "Title:", &state.title, active(FormField::Title), true);
        render_team_field(frame, rows[1], &team.name, theme::team_color(team), active(FormField::Team));
        render_field(frame, rows[2], "Day:", &grid::day_label(state.day_index), active(FormField::Day), false);
        render_field(frame, rows[3], "Start:", &grid::format_time(state.start_time()), active(FormField::Start), false);
        render_field(
            frame,
            rows[4],
            "Length:",
            &grid::duration_text(state.duration),
            active(FormField::Duration),
            false,
        );
        let freq = if state.editing.is_some() {
            format!("{} (this occurrence only)", state.frequency.as_str())
        } else {
            state.frequency.as_str().to_string()
        };
        render_field(frame, rows[5], "Repeat:", &freq, active(FormField::Frequency), false);

        let dim = theme::current().dim;
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", dim),
            Span::styled("\u{2190}/\u{2192}", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Change ", dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

const LABEL_W: usize = 8;

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool, text: bool) {
    let cursor = if active && text { "_" } else { "" };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let value = if active && !text {
        format!("\u{2039} {} \u{203a}", value)
    } else {
        format!("{}{}", value, cursor)
    };

    let line = Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_W), theme::current().dim),
        Span::styled(value, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_team_field(frame: &mut Frame, area: Rect, name: &str, color: Color, active: bool) {
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let name = if active {
        format!(" \u{2039} {} \u{203a}", name)
    } else {
        format!(" {}", name)
    };
    let line = Line::from(vec![
        Span::styled(format!("{:<width$}", "Team:", width = LABEL_W), theme::current().dim),
        Span::styled("  ", Style::default().bg(color)),
        Span::styled(name, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
