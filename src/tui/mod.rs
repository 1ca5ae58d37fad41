// TUI module - terminal dashboard
//
// Sets up the terminal, runs the event loop and restores the terminal on
// exit. The dashboard never owns loop state: every tick it pulls a snapshot
// from the orchestrator, and the only thing it sends back is a toggle.

pub mod app;
pub mod components;
pub mod layout;
pub mod scroll;
pub mod theme;
pub mod traits;
pub mod ui;

use crate::logging::LogBuffer;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use theme::ThemeKind;
use traits::Handled;

/// Redraw interval; also bounds how stale a snapshot can get
const TICK: Duration = Duration::from_millis(200);

/// Run the dashboard until the user quits
pub async fn run_tui(
    orchestrator: Orchestrator,
    log_buffer: LogBuffer,
    theme_name: &str,
    persona: String,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(
        orchestrator,
        log_buffer,
        ThemeKind::from_name(theme_name),
        persona,
    );

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(TICK);

    loop {
        app.refresh();
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick_animation();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Global keys first, then the focused panel
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_loop(),
        KeyCode::Tab | KeyCode::BackTab => app.focus_next(),
        _ => {
            if app.dispatch_to_focused(key_event) == Handled::No {
                tracing::trace!("Unhandled key: {:?}", key_event.code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collaborators, DemoBackend};
    use crate::config::PersonaConfig;
    use crate::orchestrator::LoopTiming;
    use scroll::FocusablePanel;

    fn test_app() -> App {
        let backend = DemoBackend::new(PersonaConfig::default()).with_latency(Duration::ZERO);
        let timing = LoopTiming {
            settle_delay: Duration::ZERO,
            generation_pause: Duration::ZERO,
            cycle_interval: Duration::from_secs(3600),
        };
        let orchestrator = Orchestrator::new(Collaborators::from_backend(backend), timing);
        App::new(orchestrator, LogBuffer::new(), ThemeKind::Dark, "Elif".into())
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_event(app, KeyEvent::new(code, modifiers));
    }

    #[test]
    fn quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);

        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn space_and_s_toggle_loop() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(app.snapshot.active);

        press(&mut app, KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(!app.snapshot.active);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = test_app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release);
        assert!(!app.should_quit);
    }

    #[test]
    fn tab_moves_focus() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(app.is_focused(FocusablePanel::Logs));
    }
}
