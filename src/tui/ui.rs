// Screen composition
//
// ┌ title ───────────────────────────────────────────────┐
// │ stage cards (4)                                        │
// │ content feed          │ live terminal                  │
// │                       │ growth                         │
// │                       │ grounding                      │
// │ system logs                                            │
// └ status ──────────────────────────────────────────────┘
//
// Below the Normal breakpoint the side column stacks under the feed and the
// growth and grounding panels are dropped.

use super::app::App;
use super::components::{
    activity_panel, feed_panel, growth_panel, logs_panel, sources_panel, stage_cards, status_bar,
    title_bar,
};
use super::layout::Breakpoint;
use crate::orchestrator::MAX_LOGS;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

const TITLE_HEIGHT: u16 = 3;
const STAGE_HEIGHT: u16 = 3;
const LOGS_HEIGHT: u16 = 8;
const STATUS_HEIGHT: u16 = 2;
const ACTIVITY_HEIGHT: u16 = MAX_LOGS as u16 + 2;
const GROWTH_HEIGHT: u16 = 6;

pub fn draw(f: &mut Frame, app: &mut App) {
    let [title, stages, body, logs, status] = Layout::vertical([
        Constraint::Length(TITLE_HEIGHT),
        Constraint::Length(STAGE_HEIGHT),
        Constraint::Min(8),
        Constraint::Length(LOGS_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(f.area());

    title_bar::render(f, title, app);
    stage_cards::render(f, stages, app);
    draw_body(f, body, app);
    logs_panel::render(f, logs, app);
    status_bar::render(f, status, app);
}

fn draw_body(f: &mut Frame, area: Rect, app: &mut App) {
    if !Breakpoint::from_width(area.width).at_least(Breakpoint::Normal) {
        let [feed, activity] =
            Layout::vertical([Constraint::Min(4), Constraint::Length(ACTIVITY_HEIGHT)])
                .areas(area);
        feed_panel::render(f, feed, app);
        activity_panel::render(f, activity, app);
        return;
    }

    let [feed, side] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [activity, growth, sources] = Layout::vertical([
        Constraint::Length(ACTIVITY_HEIGHT),
        Constraint::Length(GROWTH_HEIGHT),
        Constraint::Min(3),
    ])
    .areas(side);

    feed_panel::render(f, feed, app);
    activity_panel::render(f, activity, app);
    growth_panel::render(f, growth, app);
    sources_panel::render(f, sources, app);
}
