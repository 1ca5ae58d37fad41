//! Content feed panel
//!
//! Lists published assets newest first with a detail strip for the asset
//! under the cursor (or the newest one when nothing is selected).

use super::formatters::{format_clock, format_compact_number};
use super::scrollbar::render_scrollbar;
use crate::model::ContentAsset;
use crate::tui::app::App;
use crate::tui::scroll::{FocusablePanel, ScrollState};
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive, Scrollable, Selectable};
use crate::util::truncate_display;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Rows reserved for the detail strip when the panel is tall enough
const DETAIL_HEIGHT: u16 = 6;

pub struct FeedPanel {
    scroll: ScrollState,

    /// Selected asset index into the newest-first list
    pub selected: Option<usize>,

    asset_count: usize,
}

impl FeedPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::manual(),
            selected: None,
            asset_count: 0,
        }
    }

    /// Keep the selection valid after the asset buffer changed
    pub fn sync_count(&mut self, count: usize) {
        self.asset_count = count;
        if let Some(idx) = self.selected {
            if idx >= count {
                self.selected = count.checked_sub(1);
            }
        }
    }
}

impl Default for FeedPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollable for FeedPanel {
    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Selectable for FeedPanel {
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    fn item_count(&self) -> usize {
        self.asset_count
    }
}

impl Interactive for FeedPanel {
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
                self.selected = (self.asset_count > 0).then_some(0);
                Handled::Yes
            }
            KeyCode::End => {
                self.scroll_to_bottom();
                self.selected = self.asset_count.checked_sub(1);
                Handled::Yes
            }
            KeyCode::Esc => {
                if self.selected.take().is_some() {
                    self.scroll_to_top();
                    Handled::Yes
                } else {
                    Handled::No
                }
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select asset  Esc:clear")
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.is_focused(FocusablePanel::Feed);
    let assets = &app.snapshot.assets;

    let title = format!(" Content Feed ({}) ", assets.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(focused))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if assets.is_empty() {
        let hint = if app.snapshot.active {
            "Waiting for the first published asset..."
        } else {
            "No content yet. Press space to start the loop."
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(app.theme.muted)),
            inner,
        );
        return;
    }

    let show_detail = inner.height > DETAIL_HEIGHT + 3;
    let [list_area, detail_area] = if show_detail {
        Layout::vertical([Constraint::Min(3), Constraint::Length(DETAIL_HEIGHT)]).areas(inner)
    } else {
        [inner, Rect::default()]
    };

    app.feed_panel
        .scroll
        .update_dimensions(assets.len(), list_area.height as usize);
    let (start, end) = app.feed_panel.scroll.visible_range();
    let width = list_area.width.saturating_sub(1) as usize;

    let items: Vec<ListItem> = assets[start..end]
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let line = feed_row(asset, width, &app.theme);
            if focused && app.feed_panel.selected == Some(start + i) {
                ListItem::new(line).style(app.theme.selected())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    f.render_widget(List::new(items), list_area);
    render_scrollbar(f, area, &app.feed_panel.scroll);

    if show_detail {
        let asset = app.selected_asset().or(assets.first());
        if let Some(asset) = asset {
            render_detail(f, detail_area, asset, &app.theme);
        }
    }
}

fn feed_row<'a>(asset: &'a ContentAsset, width: usize, theme: &Theme) -> Line<'a> {
    let prefix = format!(
        "{} {:<9} {:<9} ",
        format_clock(asset.created_at),
        asset.platform.as_str(),
        asset.content_type.as_str()
    );
    let suffix = format!(
        " {:>6} {:>3}%",
        format_compact_number(asset.metrics.views),
        asset.metrics.naturalness_score
    );
    let hook_width = width.saturating_sub(prefix.len() + suffix.len());

    Line::from(vec![
        Span::styled(prefix, Style::default().fg(theme.muted)),
        Span::styled(
            format!("{:<w$}", truncate_display(&asset.hook, hook_width), w = hook_width),
            Style::default().fg(theme.fg),
        ),
        Span::styled(suffix, Style::default().fg(theme.accent)),
    ])
}

fn render_detail(f: &mut Frame, area: Rect, asset: &ContentAsset, theme: &Theme) {
    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.fg);
    let metrics = &asset.metrics;

    let lines = vec![
        Line::from(vec![
            Span::styled(
                asset.hook.as_str(),
                Style::default()
                    .fg(theme.title)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  @ {}", asset.behavior_model), label),
        ]),
        Line::from(vec![
            Span::styled("views ", label),
            Span::styled(format_compact_number(metrics.views), value),
            Span::styled("  engagement ", label),
            Span::styled(format!("{:.1}%", metrics.engagement_rate), value),
            Span::styled("  natural ", label),
            Span::styled(format!("{}%", metrics.naturalness_score), value),
            Span::styled("  risk ", label),
            Span::styled(format!("{}%", metrics.risk_score), value),
            Span::styled("  audio ", label),
            Span::styled(format!("{}", metrics.audio_depth), value),
        ]),
        Line::from(vec![
            Span::styled("media ", label),
            Span::styled(media_kind(asset), value),
            Span::styled("  hash ", label),
            Span::styled(asset.visual_hash.as_str(), value),
        ]),
        Line::from(Span::styled(asset.caption.as_str(), value)),
    ];

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(detail, area);
}

/// Short description of the attached media, e.g. "image/png"
fn media_kind(asset: &ContentAsset) -> String {
    match (&asset.image_url, &asset.video_url) {
        (_, Some(_)) => "video".to_string(),
        (Some(url), None) => url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|mime| !mime.is_empty())
            .unwrap_or("image")
            .to_string(),
        (None, None) => "none".to_string(),
    }
}
