use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::calendar::{TeamDirectory, TeamFilter};
use crate::theme;

/// One-line team legend. Number keys toggle teams in the filter, so each
/// entry is prefixed with its key.
pub struct Legend;

impl Legend {
    pub fn render(frame: &mut Frame, area: Rect, teams: &TeamDirectory, filter: &TeamFilter) {
        let t = theme::current();
        let mut spans = vec![Span::styled(" ", t.dim)];

        for (i, team) in teams.legend().iter().enumerate() {
            let shown = filter.is_empty() || filter.contains(&team.name);
            let name_style = if !shown {
                t.dim
            } else if filter.contains(&team.name) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let swatch = if shown {
                Style::default().bg(theme::team_color(team))
            } else {
                t.dim
            };
            spans.push(Span::styled(format!("{}", i + 1), t.dim));
            spans.push(Span::styled(if shown { "  " } else { "\u{2591}\u{2591}" }, swatch));
            spans.push(Span::styled(format!(" {}  ", team.name), name_style));
        }

        let hint = if filter.is_empty() {
            "(all teams)"
        } else {
            "0:show all"
        };
        spans.push(Span::styled(hint, t.dim));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn rendered(filter: &TeamFilter) -> String {
        let teams = TeamDirectory::default();
        let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
        terminal
            .draw(|frame| Legend::render(frame, frame.area(), &teams, filter))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn entries_are_numbered_in_legend_order() {
        let text = rendered(&TeamFilter::default());
        let a = text.find("Team A").unwrap();
        let d = text.find("Team D").unwrap();
        let rnd = text.find("R&D Events").unwrap();
        assert!(a < d && d < rnd, "{text}");
        assert!(text.contains("5"));
        assert!(text.contains("(all teams)"));
    }

    #[test]
    fn active_filter_offers_reset_hint() {
        let filter: TeamFilter = ["Team B"].into_iter().collect();
        assert!(rendered(&filter).contains("0:show all"));
    }
}
