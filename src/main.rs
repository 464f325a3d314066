mod app;
mod calendar;
mod components;
mod config;
mod event;
mod logging;
mod theme;
mod tui;

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use app::{App, InputMode};
use calendar::persist::MemoryStore;
use calendar::{JsonFileStore, Persistence};
use clap::Parser;
use color_eyre::Result;
use components::week_view::{GridGeometry, WeekViewProps};
use config::Config;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::Input;
use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;
use tracing::info;

#[derive(Parser)]
#[command(name = "sprint-calendar")]
#[command(about = "Two-week sprint ceremony calendar for the terminal")]
struct Cli {
    /// Config file (default: <config dir>/sprint-calendar/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep changes in memory only; nothing is read from or written to disk
    #[arg(long)]
    memory: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    theme::init(&config.theme);
    logging::init(&config.log_file(), &config.log_level)?;

    if cli.memory {
        info!("starting with in-memory store");
        launch(App::new(Rc::new(MemoryStore::new()), config))
    } else {
        let store = JsonFileStore::new(config.data_dir());
        info!(data_dir = %store.dir().display(), "starting");
        launch(App::new(store, config))
    }
}

fn launch<P: Persistence>(mut app: App<P>) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run<P: Persistence>(terminal: &mut tui::Tui, app: &mut App<P>) -> Result<()> {
    while app.running {
        app.sync_layout();

        let mut geometry = None;
        terminal.draw(|frame| geometry = render(frame, app))?;
        app.grid = geometry;

        let Some(input) = event::next_input(Duration::from_millis(100))? else {
            continue;
        };

        let key = match input {
            Input::Mouse(mouse) => {
                if app.input_mode == InputMode::Normal && !app.show_help && app.detail.is_none() {
                    app.handle_mouse(mouse);
                }
                continue;
            }
            Input::Key(key) => key,
        };

        // Clear status message on any key
        app.status_message = None;

        if app.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                app.show_help = false;
            }
            continue;
        }

        if app.detail.is_some() && app.input_mode == InputMode::Normal {
            handle_detail_input(app, key.code);
            continue;
        }

        match app.input_mode {
            InputMode::Normal => handle_normal_input(app, key),
            InputMode::Form => handle_form_input(app, key.code),
            InputMode::Teams => handle_team_input(app, key),
            InputMode::Confirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
                _ => {}
            },
        }
    }

    Ok(())
}

fn render<P: Persistence>(frame: &mut Frame, app: &App<P>) -> Option<GridGeometry> {
    let area = frame.area();
    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    components::Legend::render(frame, layout[0], app.teams(), &app.filter);

    let props = WeekViewProps {
        week: app.week,
        events: app.events(),
        teams: app.teams(),
        filter: &app.filter,
        placements: &app.placements,
        cursor: (app.cursor_day, app.cursor_slot),
        scroll: app.scroll,
        selected: app.selected_id(),
        dragging: app.drag.as_ref(),
        today: app.today,
        dates: app.week_dates(),
    };
    let geometry = components::WeekView::render(frame, layout[1], &props);

    components::StatusBar::render(
        frame,
        layout[2],
        app.week,
        app.input_mode,
        app.drag.is_some(),
        app.status_message.as_deref(),
    );

    if let Some(event) = app.detail_event() {
        components::event_detail::render_detail_popup(
            frame,
            area,
            event,
            app.events(),
            app.placement(&event.id),
            app.teams(),
        );
    }

    if let Some(ref form) = app.form_state {
        components::EventForm::render(frame, area, form, app.teams());
    }

    if let Some(ref form) = app.team_form {
        components::TeamForm::render(frame, area, form, app.teams());
    }

    if let Some(ref confirm) = app.confirm {
        components::popup::render_confirm(frame, area, &confirm.question());
    }

    if app.show_help {
        components::popup::render_help(frame, area);
    }

    geometry
}

fn handle_normal_input<P: Persistence>(app: &mut App<P>, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Esc, _) => {
            if app.drag.is_some() {
                app.cancel_drag();
            } else {
                app.running = false;
            }
        }
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.move_day(false),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.move_day(true),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.move_slot(-1),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.move_slot(1),
        (KeyCode::PageUp, _) => app.move_slot(-4),
        (KeyCode::PageDown, _) => app.move_slot(4),
        (KeyCode::Char('w'), _) => app.toggle_week(),
        (KeyCode::Char('['), _) => app.set_week(calendar::Week::One),
        (KeyCode::Char(']'), _) => app.set_week(calendar::Week::Two),
        (KeyCode::Tab, _) => app.cycle_selection(),
        (KeyCode::Char('m'), _) | (KeyCode::Enter, _) if app.drag.is_some() => app.drop_at_cursor(),
        (KeyCode::Char('m'), _) => app.pick_up(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Char('n'), _) => app.open_event_form(),
        (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.request_delete(),
        (KeyCode::Char('R'), _) => app.request_reset_events(),
        (KeyCode::Char('T'), _) => app.open_team_settings(),
        (KeyCode::Char('0'), _) => app.clear_filter(),
        (KeyCode::Char(c @ '1'..='9'), _) => {
            app.toggle_team_filter(c as usize - '0' as usize)
        }
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_detail_input<P: Persistence>(app: &mut App<P>, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter => app.close_detail(),
        KeyCode::Char('e') => {
            app.close_detail();
            app.open_edit_form();
        }
        KeyCode::Char('d') => {
            app.close_detail();
            app.request_delete();
        }
        KeyCode::Char('m') => {
            app.close_detail();
            app.pick_up();
        }
        _ => {}
    }
}

fn handle_form_input<P: Persistence>(app: &mut App<P>, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form_prev_field(),
        KeyCode::Left => app.form_adjust(false),
        KeyCode::Right => app.form_adjust(true),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn handle_team_input<P: Persistence>(app: &mut App<P>, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => app.request_reset_teams(),
        (KeyCode::Esc, _) => app.close_team_settings(),
        (KeyCode::Enter, _) => app.submit_team_form(),
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => app.team_toggle_field(),
        (KeyCode::Up, _) => app.team_select(false),
        (KeyCode::Down, _) => app.team_select(true),
        (KeyCode::Backspace, _) => app.team_backspace(),
        (KeyCode::Char(c), _) => app.team_input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_a_named_option() {
        let cli = Cli::try_parse_from(["sprint-calendar", "-c", "team.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("team.toml")));
        assert!(!cli.memory);

        let cli = Cli::try_parse_from(["sprint-calendar", "--config", "a.toml", "--memory"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert!(cli.memory);

        assert!(Cli::try_parse_from(["sprint-calendar", "team.toml"]).is_err());
    }
}
