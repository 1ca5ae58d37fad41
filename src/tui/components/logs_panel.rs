//! System logs panel
//!
//! Shows tracing output captured by the TUI log layer, oldest first, following
//! the bottom as entries arrive. Owns its scroll and selection state; the
//! entries themselves live in the shared `LogBuffer`.

use super::formatters::format_clock;
use super::scrollbar::render_scrollbar;
use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use crate::tui::scroll::{FocusablePanel, ScrollState};
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive, Scrollable, Selectable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    scroll: ScrollState,

    /// Selected entry index (None = follow mode)
    pub selected: Option<usize>,

    entry_count: usize,
}

impl LogsPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::new(),
            selected: None,
            entry_count: 0,
        }
    }

    /// Sync with the current entries, called each frame
    pub fn sync_entries(&mut self, count: usize, viewport_height: usize) {
        self.entry_count = count;
        self.scroll.update_dimensions(count, viewport_height);

        if let Some(idx) = self.selected {
            if idx >= count {
                self.selected = count.checked_sub(1);
            }
        }
    }

    fn render_entries(
        &self,
        f: &mut Frame,
        area: Rect,
        entries: &[LogEntry],
        theme: &Theme,
        focused: bool,
    ) {
        let (start, end) = self.scroll.visible_range();

        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(idx, entry)| {
                let style = if focused && self.selected == Some(idx) {
                    theme.selected()
                } else {
                    log_level_style(entry.level, theme)
                };
                ListItem::new(format_log_entry(entry)).style(style)
            })
            .collect();

        let title = if focused && self.selected.is_some() {
            " System Logs [select] "
        } else if self.scroll.auto_follow {
            " System Logs "
        } else {
            " System Logs [scroll] "
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(theme.panel_border(focused))
                .title(title),
        );

        f.render_widget(list, area);
        render_scrollbar(f, area, &self.scroll);
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollable for LogsPanel {
    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Selectable for LogsPanel {
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    fn item_count(&self) -> usize {
        self.entry_count
    }

    // Selection starts from the most recent entry at the bottom
    fn select_previous(&mut self) {
        let Some(last) = self.entry_count.checked_sub(1) else {
            return;
        };
        let prev = self.selected.map_or(last, |idx| idx.saturating_sub(1));
        self.selected = Some(prev);
        self.scroll.auto_follow = false;
        self.scroll.ensure_visible(prev);
    }

    fn select_next(&mut self) {
        let Some(last) = self.entry_count.checked_sub(1) else {
            return;
        };
        let next = self.selected.map_or(last, |idx| (idx + 1).min(last));
        self.selected = Some(next);
        self.scroll.ensure_visible(next);
    }
}

impl Interactive for LogsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                Handled::Yes
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Handled::Yes
            }
            KeyCode::Home => {
                self.scroll_to_top();
                self.selected = (self.entry_count > 0).then_some(0);
                Handled::Yes
            }
            KeyCode::End => {
                self.scroll_to_bottom();
                self.selected = None;
                Handled::Yes
            }
            KeyCode::PageUp => {
                self.page_up();
                Handled::Yes
            }
            KeyCode::PageDown => {
                self.page_down();
                Handled::Yes
            }
            KeyCode::Esc => {
                if self.selected.is_some() {
                    self.selected = None;
                    self.scroll.scroll_to_bottom();
                    Handled::Yes
                } else {
                    Handled::No
                }
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  Home/End:jump  Esc:follow")
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}: {}",
        format_clock(entry.timestamp),
        entry.level.as_str(),
        short_target(&entry.target),
        entry.message
    )
}

/// Last path segment of a tracing target, e.g. "orchestrator"
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn log_level_style(level: LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.log_error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warning),
        LogLevel::Info => Style::default().fg(theme.info),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.log_debug),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let height = area.height.saturating_sub(2) as usize;
    let entries = app.log_buffer.get_all();
    let focused = app.is_focused(FocusablePanel::Logs);

    app.logs_panel.sync_entries(entries.len(), height);
    app.logs_panel
        .render_entries(f, area, &entries, &app.theme, focused);
}
