// Status bar component
//
// Uptime, cycle count, asset count, countdown to the next cycle and the last
// failure. Narrow terminals get an icon-only variant.

use super::formatters::format_countdown;
use crate::orchestrator::MAX_ASSETS;
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = &app.snapshot;
    let wide = Breakpoint::from_width(area.width).at_least(Breakpoint::Wide);

    let next = format_countdown(snapshot.next_cycle_at, Utc::now());

    let mut text = if wide {
        format!(
            " {} │ cycles {} │ assets {}/{} │ sources {}",
            app.uptime(),
            snapshot.cycles_completed,
            snapshot.assets.len(),
            MAX_ASSETS,
            snapshot.sources.len(),
        )
    } else {
        format!(
            " {} │ ⟳ {} │ ▣ {}",
            app.uptime(),
            snapshot.cycles_completed,
            snapshot.assets.len(),
        )
    };
    if let Some(next) = next {
        text.push_str(&format!(" │ next in {}", next));
    }
    if wide {
        if let Some(hint) = app.focus_hint() {
            text.push_str(&format!(" │ {}", hint));
        }
    }

    let mut spans = vec![Span::styled(text, Style::default().fg(app.theme.status_bar))];
    if let Some(err) = &snapshot.last_error {
        spans.push(Span::styled(
            format!(" │ ✗ {}", err),
            Style::default().fg(app.theme.log_error),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
