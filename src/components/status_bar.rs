use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::InputMode;
use crate::calendar::Week;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        week: Week,
        mode: InputMode,
        dragging: bool,
        message: Option<&str>,
    ) {
        let w = area.width as usize;
        let style = theme::current().status;

        let mode_str = match mode {
            InputMode::Form => " [Event]",
            InputMode::Teams => " [Teams]",
            InputMode::Confirm => " [Confirm]",
            InputMode::Normal if dragging => " [Moving]",
            InputMode::Normal => "",
        };

        let right_text = if let Some(msg) = message {
            format!(" {} ", msg)
        } else {
            match mode {
                InputMode::Normal if dragging => " arrows:Target m/Enter:Drop Esc:Cancel".to_string(),
                InputMode::Normal if w >= 90 => {
                    " hjkl:Move w:Week n:New e:Edit m:Move d:Del Enter:Detail T:Teams ?:Help q:Quit"
                        .to_string()
                }
                InputMode::Normal if w >= 50 => " w:Week n:New m:Move ?:Help q:Quit".to_string(),
                InputMode::Confirm => " y:Yes n:No".to_string(),
                _ => " Esc:Close".to_string(),
            }
        };

        let left = format!(" Week {}{} ", week.number(), mode_str);
        let padding_len = w.saturating_sub(left.chars().count() + right_text.chars().count());
        let padding = " ".repeat(padding_len);

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right_text, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
