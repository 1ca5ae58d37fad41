// Title bar component
//
// App name, loop status with spinner while a cycle runs, and the persona.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let status = app.snapshot.status.as_str();
    let indicator = match app.spinner_char() {
        Some(c) => format!("{} {}", c, status),
        None if app.snapshot.active => format!("● {}", status),
        None => format!("○ {}", status),
    };

    let title_text = format!(" contentloop  {} ──── {}", indicator, app.persona);

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(" space:toggle  q:quit ").right_aligned()),
        );

    f.render_widget(title, area);
}
