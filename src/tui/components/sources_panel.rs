//! Grounding sources from the latest trend analysis

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
    let sources = &app.snapshot.sources;
    let width = area.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = if sources.is_empty() {
        vec![Line::from(Span::styled(
            "No grounding yet",
            Style::default().fg(theme.muted),
        ))]
    } else {
        sources
            .iter()
            .map(|source| {
                Line::from(vec![
                    Span::styled("◆ ", Style::default().fg(theme.accent)),
                    Span::styled(
                        truncate_display(source.display_title(), width),
                        Style::default().fg(theme.source),
                    ),
                ])
            })
            .collect()
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" Grounding ({}) ", sources.len())),
    );
    f.render_widget(panel, area);
}
