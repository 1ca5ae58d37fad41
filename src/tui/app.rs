// TUI application state
//
// App holds the latest loop snapshot, pulled from the orchestrator every tick,
// plus presentation-only state: focus, panel selection, animation frame.
// The loop itself is never driven from here; App only toggles it.

use super::components::feed_panel::FeedPanel;
use super::components::logs_panel::LogsPanel;
use super::scroll::FocusablePanel;
use super::theme::{Theme, ThemeKind};
use super::traits::{Handled, Interactive};
use crate::logging::LogBuffer;
use crate::model::ContentAsset;
use crate::orchestrator::{LoopSnapshot, Orchestrator};
use crossterm::event::KeyEvent;
use std::time::Instant;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct App {
    orchestrator: Orchestrator,

    /// Loop state as of the last refresh
    pub snapshot: LoopSnapshot,

    /// System log capture shared with the tracing layer
    pub log_buffer: LogBuffer,

    pub theme: Theme,

    /// Persona label for the title bar
    pub persona: String,

    pub feed_panel: FeedPanel,
    pub logs_panel: LogsPanel,
    pub focused: FocusablePanel,

    pub should_quit: bool,

    /// When the dashboard started (for uptime display)
    pub start_time: Instant,

    animation_frame: usize,
}

impl App {
    pub fn new(
        orchestrator: Orchestrator,
        log_buffer: LogBuffer,
        theme: ThemeKind,
        persona: String,
    ) -> Self {
        let snapshot = orchestrator.snapshot();
        Self {
            orchestrator,
            snapshot,
            log_buffer,
            theme: theme.theme(),
            persona,
            feed_panel: FeedPanel::new(),
            logs_panel: LogsPanel::new(),
            focused: FocusablePanel::default(),
            should_quit: false,
            start_time: Instant::now(),
            animation_frame: 0,
        }
    }

    /// Pull a fresh snapshot and keep the feed selection in range
    pub fn refresh(&mut self) {
        self.snapshot = self.orchestrator.snapshot();
        self.feed_panel.sync_count(self.snapshot.assets.len());
    }

    /// Start or stop the loop
    pub fn toggle_loop(&mut self) {
        let now_active = self.orchestrator.toggle();
        tracing::info!(
            "Loop {} from dashboard",
            if now_active { "started" } else { "stopped" }
        );
        self.refresh();
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Spinner frame while a cycle is running, blank otherwise
    pub fn spinner_char(&self) -> Option<char> {
        self.snapshot
            .cycle_in_flight
            .then(|| SPINNER[self.animation_frame % SPINNER.len()])
    }

    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;

        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }

    pub fn is_focused(&self, panel: FocusablePanel) -> bool {
        self.focused == panel
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    /// Route a key to the focused panel
    pub fn dispatch_to_focused(&mut self, key: KeyEvent) -> Handled {
        match self.focused {
            FocusablePanel::Feed => self.feed_panel.handle_key(key),
            FocusablePanel::Logs => self.logs_panel.handle_key(key),
        }
    }

    pub fn focus_hint(&self) -> Option<&'static str> {
        match self.focused {
            FocusablePanel::Feed => self.feed_panel.focus_hint(),
            FocusablePanel::Logs => self.logs_panel.focus_hint(),
        }
    }

    /// Asset under the feed cursor
    pub fn selected_asset(&self) -> Option<&ContentAsset> {
        self.feed_panel
            .selected
            .and_then(|idx| self.snapshot.assets.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collaborators, DemoBackend};
    use crate::config::PersonaConfig;
    use crate::orchestrator::LoopTiming;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::Duration;

    fn test_app() -> App {
        let backend = DemoBackend::new(PersonaConfig::default())
            .with_latency(Duration::ZERO)
            .with_missing_image_rate(0.0);
        let timing = LoopTiming {
            settle_delay: Duration::ZERO,
            generation_pause: Duration::ZERO,
            cycle_interval: Duration::from_secs(3600),
        };
        let orchestrator = Orchestrator::new(Collaborators::from_backend(backend), timing);
        App::new(
            orchestrator,
            LogBuffer::new(),
            ThemeKind::Dark,
            "Elif".to_string(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn toggle_starts_and_stops_loop() {
        let mut app = test_app();
        assert!(!app.snapshot.active);

        app.toggle_loop();
        assert!(app.snapshot.active);

        app.toggle_loop();
        assert!(!app.snapshot.active);
        app.orchestrator.shutdown().await;
    }

    #[tokio::test]
    async fn selection_follows_feed_after_cycle() {
        let mut app = test_app();
        app.orchestrator.run_single().await;
        app.refresh();

        let produced = app.snapshot.assets.len();
        assert!(produced > 0);
        assert!(app.selected_asset().is_none());

        assert_eq!(app.dispatch_to_focused(key(KeyCode::Down)), Handled::Yes);
        assert_eq!(app.selected_asset(), app.snapshot.assets.first());

        for _ in 0..produced + 2 {
            app.dispatch_to_focused(key(KeyCode::Char('j')));
        }
        assert_eq!(app.feed_panel.selected, Some(produced - 1));
    }

    #[test]
    fn spinner_only_while_cycle_runs() {
        let mut app = test_app();
        assert_eq!(app.spinner_char(), None);

        app.snapshot.cycle_in_flight = true;
        let first = app.spinner_char();
        app.tick_animation();
        assert!(first.is_some());
        assert_ne!(app.spinner_char(), first);
    }

    #[test]
    fn focus_routes_keys() {
        let mut app = test_app();
        app.focus_next();
        assert!(app.is_focused(FocusablePanel::Logs));
        assert_eq!(
            app.focus_hint(),
            Some("↑↓:select  Home/End:jump  Esc:follow")
        );
    }
}
