// Components module - dashboard building blocks
//
// Shell components frame every screen:
// - Title bar: app name, loop status, persona
// - Status bar: uptime, counts, next-cycle countdown, last failure
//
// Loop panels:
// - Stage cards, content feed, live terminal, growth chart, grounding sources
// - System logs: tracing output captured for the dashboard

pub mod activity_panel;
pub mod feed_panel;
pub mod formatters;
pub mod growth_panel;
pub mod logs_panel;
pub mod scrollbar;
pub mod sources_panel;
pub mod stage_cards;
pub mod status_bar;
pub mod title_bar;
