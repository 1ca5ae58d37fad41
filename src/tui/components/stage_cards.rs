//! Stage cards: one per loop stage, the active one highlighted
//!
//! Each card shows the newest loop log line belonging to its stage, or an
//! idle caption when the log window holds none.

use crate::model::LogEntry;
use crate::orchestrator::{LoopSnapshot, Stage};
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::util::truncate_display;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Log prefixes that belong to each stage
fn stage_prefixes(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::Analyze => &["Scanning"],
        Stage::Plan => &["Planning"],
        Stage::Produce => &["Production", "Rendering", "Published"],
        Stage::Learn => &["Updating"],
    }
}

fn idle_caption(stage: Stage) -> &'static str {
    match stage {
        Stage::Analyze => "Ready",
        Stage::Plan => "Standing by",
        Stage::Produce => "Idle",
        Stage::Learn => "Synced",
    }
}

/// Newest log line for a stage
pub fn stage_headline(snapshot: &LoopSnapshot, stage: Stage) -> Option<&LogEntry> {
    let prefixes = stage_prefixes(stage);
    snapshot
        .logs
        .iter()
        .find(|l| prefixes.iter().any(|p| l.message.starts_with(p)))
}

/// Whether a card is drawn as working
pub fn is_working(snapshot: &LoopSnapshot, stage: Stage) -> bool {
    snapshot.active && snapshot.cycle_in_flight && snapshot.stage == stage
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let compact = !Breakpoint::from_width(area.width).at_least(Breakpoint::Normal);
    let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for (stage, cell) in Stage::ALL.iter().zip(cells.iter()) {
        let stage = *stage;
        let working = is_working(&app.snapshot, stage);
        let color = if working {
            theme.stage_active
        } else {
            theme.stage_idle
        };

        let marker = match (working, app.spinner_char()) {
            (true, Some(c)) => c,
            _ => '·',
        };
        let mut title_style = Style::default().fg(color);
        if working {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let title = format!(" {} {} {} ", stage.index() + 1, stage.label(), marker);

        let width = cell.width.saturating_sub(2) as usize;
        let headline = stage_headline(&app.snapshot, stage)
            .map(|l| l.message.as_str())
            .unwrap_or(idle_caption(stage));

        let body = if compact {
            Line::from(Span::styled(
                if working { "working" } else { "idle" },
                Style::default().fg(color),
            ))
        } else {
            Line::from(Span::styled(
                truncate_display(headline, width),
                Style::default().fg(if working { theme.fg } else { theme.muted }),
            ))
        };

        let card = Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(color))
                .title(Span::styled(title, title_style)),
        );
        f.render_widget(card, *cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogSeverity;
    use chrono::Utc;

    fn snapshot_with(messages: &[&str]) -> LoopSnapshot {
        // messages are given newest first, like the snapshot
        let logs = messages
            .iter()
            .enumerate()
            .map(|(i, m)| LogEntry {
                id: (messages.len() - i) as u64,
                message: m.to_string(),
                severity: LogSeverity::Info,
                timestamp: Utc::now(),
            })
            .collect();
        LoopSnapshot {
            logs,
            ..LoopSnapshot::default()
        }
    }

    #[test]
    fn headline_is_newest_matching_line() {
        let snapshot = snapshot_with(&[
            "Published to TikTok (94% natural): Ferry",
            "Rendering POV for TikTok: Ferry",
            "Production started: 1 plans queued",
            "Planning content from 3 trends...",
            "Scanning live trends and local signals...",
        ]);

        assert_eq!(
            stage_headline(&snapshot, Stage::Produce).map(|l| l.message.as_str()),
            Some("Published to TikTok (94% natural): Ferry")
        );
        assert_eq!(
            stage_headline(&snapshot, Stage::Plan).map(|l| l.message.as_str()),
            Some("Planning content from 3 trends...")
        );
        assert!(stage_headline(&snapshot, Stage::Learn).is_none());
    }

    #[test]
    fn only_in_flight_stage_is_working() {
        let mut snapshot = LoopSnapshot {
            active: true,
            stage: Stage::Plan,
            ..LoopSnapshot::default()
        };
        assert!(!is_working(&snapshot, Stage::Plan));

        snapshot.cycle_in_flight = true;
        assert!(is_working(&snapshot, Stage::Plan));
        assert!(!is_working(&snapshot, Stage::Analyze));
    }
}
