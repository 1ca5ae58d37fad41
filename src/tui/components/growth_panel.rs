//! Growth chart: views of the most recent assets

use super::formatters::format_compact_number;
use crate::model::ContentAsset;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Sparkline},
    Frame,
};

/// Number of recent assets plotted
pub const GROWTH_WINDOW: usize = 10;

/// Views of the newest assets in chronological order (oldest on the left)
pub fn growth_series(assets: &[ContentAsset]) -> Vec<u64> {
    let mut series: Vec<u64> = assets
        .iter()
        .take(GROWTH_WINDOW)
        .map(|a| a.metrics.views)
        .collect();
    series.reverse();
    series
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let series = growth_series(&app.snapshot.assets);

    let total: u64 = series.iter().sum();
    let title = if series.is_empty() {
        " Growth ".to_string()
    } else {
        format!(
            " Growth · {} views over last {} ",
            format_compact_number(total),
            series.len()
        )
    };

    let chart = Sparkline::default()
        .data(&series)
        .style(Style::default().fg(theme.chart))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(title),
        );
    f.render_widget(chart, area);
}
