use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme;

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w.min(area.width), h.min(area.height))
}

/// Yes/no prompt for destructive actions.
pub fn render_confirm(frame: &mut Frame, area: Rect, question: &str) {
    let popup_w = (question.chars().count() as u16 + 6).clamp(30, area.width.max(30));
    let popup_area = centered(area, popup_w, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(question.to_string()),
        Line::from(vec![
            Span::styled("y", key_style),
            Span::styled(":Yes  ", theme::current().dim),
            Span::styled("n", key_style),
            Span::styled(":No", theme::current().dim),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    let popup_w = area.width.min(56).max(30);
    let popup_h = area.height.min(28).max(12);
    let popup_area = centered(area, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l \u{2190}/\u{2192}", "Previous/next day"),
        entry("j/k \u{2191}/\u{2193}", "Earlier/later quarter hour"),
        entry("w [ ]", "Switch sprint week"),
        entry("Tab", "Cycle overlapping events"),
        Line::from(""),
        Line::from(Span::styled("Events", section_style)),
        entry("n", "New event at cursor"),
        entry("e", "Edit event at cursor"),
        entry("d", "Delete event at cursor"),
        entry("m", "Pick up / drop event"),
        entry("mouse drag", "Move event to another slot"),
        entry("Enter", "Event details and overlaps"),
        entry("R", "Reset events to defaults"),
        Line::from(""),
        Line::from(Span::styled("Teams", section_style)),
        entry("1-9", "Toggle team in filter"),
        entry("0", "Show all teams"),
        entry("T", "Team names and colors"),
        Line::from(""),
        entry("q / Esc", "Quit / close popup"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
