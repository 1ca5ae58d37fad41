//! Live terminal: the loop's own activity log, newest first

use super::formatters::format_clock;
use crate::tui::app::App;
use crate::util::truncate_display;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = app
        .snapshot
        .logs
        .iter()
        .map(|entry| {
            let clock = format!("{} ", format_clock(entry.timestamp));
            let message_width = width.saturating_sub(clock.len());
            Line::from(vec![
                Span::styled(clock, Style::default().fg(theme.muted)),
                Span::styled(
                    truncate_display(&entry.message, message_width),
                    Style::default().fg(theme.severity(entry.severity)),
                ),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(" Live Terminal "),
    );
    f.render_widget(panel, area);
}
