use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::{TeamDirectory, TeamPatch};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamField {
    Name,
    Color,
}

/// Editing buffer for one team at a time.
#[derive(Debug, Clone)]
pub struct TeamFormState {
    pub team_ids: Vec<String>,
    pub index: usize,
    pub name: String,
    pub color: String,
    pub active_field: TeamField,
}

impl TeamFormState {
    pub fn new(teams: &TeamDirectory) -> Self {
        let team_ids: Vec<String> = teams.legend().iter().map(|t| t.id.clone()).collect();
        let mut state = Self {
            team_ids,
            index: 0,
            name: String::new(),
            color: String::new(),
            active_field: TeamField::Name,
        };
        state.load(teams);
        state
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_ids.get(self.index).map(String::as_str)
    }

    /// Refill the buffers from the selected team.
    pub fn load(&mut self, teams: &TeamDirectory) {
        if let Some(team) = self.team_id().and_then(|id| teams.get(id)) {
            self.name = team.name.clone();
            self.color = team.color.clone();
        }
    }

    pub fn select(&mut self, forward: bool, teams: &TeamDirectory) {
        let total = self.team_ids.len();
        if total == 0 {
            return;
        }
        self.index = if forward {
            (self.index + 1) % total
        } else {
            (self.index + total - 1) % total
        };
        self.load(teams);
    }

    pub fn toggle_field(&mut self) {
        self.active_field = match self.active_field {
            TeamField::Name => TeamField::Color,
            TeamField::Color => TeamField::Name,
        };
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            TeamField::Name => self.name.push(c),
            TeamField::Color => self.color.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            TeamField::Name => {
                self.name.pop();
            }
            TeamField::Color => {
                self.color.pop();
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && theme::parse_color(&self.color).is_some()
    }

    pub fn to_patch(&self) -> TeamPatch {
        TeamPatch {
            name: Some(self.name.trim().to_string()),
            color: Some(self.color.trim().to_string()),
        }
    }
}

pub struct TeamForm;

impl TeamForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &TeamFormState, teams: &TeamDirectory) {
        let popup_w = area.width.min(60).max(34);
        let popup_h = area.height.min(14).max(10);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Team Configuration ")
            .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let cols = Layout::horizontal([Constraint::Length(20), Constraint::Min(10)]).split(inner);

        let items: Vec<ListItem> = state
            .team_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let team = teams.resolve(id);
                let style = if i == state.index {
                    theme::current().selected
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled("  ", Style::default().bg(theme::team_color(team))),
                    Span::styled(format!(" {}", team.name), style),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items), cols[0]);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(cols[1]);

        let dim = theme::current().dim;
        let field = |label: &str, value: &str, active: bool| {
            let style = if active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            let cursor = if active { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:<7}", label), dim),
                Span::styled(format!("{}{}", value, cursor), style),
            ])
        };

        frame.render_widget(
            Paragraph::new(field("Name:", &state.name, state.active_field == TeamField::Name)),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(field("Color:", &state.color, state.active_field == TeamField::Color)),
            rows[1],
        );

        let preview = match theme::parse_color(&state.color) {
            Some(c) => Line::from(vec![
                Span::styled(format!("{:<7}", "Swatch:"), dim),
                Span::styled("      ", Style::default().bg(c)),
            ]),
            None => Line::from(Span::styled("Color must be #rrggbb or a name", Style::default().fg(Color::Red))),
        };
        frame.render_widget(Paragraph::new(preview), rows[3]);

        let help = Line::from(vec![
            Span::styled("\u{2191}/\u{2193}", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Team ", dim),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Field ", dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", dim),
            Span::styled("^R", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Reset", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reloads_buffers() {
        let teams = TeamDirectory::default();
        let mut form = TeamFormState::new(&teams);
        assert_eq!(form.name, "Team A");
        form.input_char('!');
        form.select(true, &teams);
        assert_eq!(form.name, "Team B");
        form.select(false, &teams);
        form.select(false, &teams);
        assert_eq!(form.team_id(), Some("rndEvents"));
    }

    #[test]
    fn colour_must_parse() {
        let teams = TeamDirectory::default();
        let mut form = TeamFormState::new(&teams);
        form.toggle_field();
        form.backspace();
        assert!(!form.is_valid());
        form.input_char('0');
        assert!(form.is_valid());
        assert_eq!(form.to_patch().color.as_deref(), Some("#4A90E0"));
    }
}
