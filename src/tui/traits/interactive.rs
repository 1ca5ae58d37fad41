//! Keyboard routing for focusable panels

use crossterm::event::KeyEvent;

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the panel
    Yes,
    /// Event was not handled, App falls back to global keys
    No,
}

/// Panels that handle keyboard input while focused
pub trait Interactive {
    /// Handle a key event; `Handled::No` lets it bubble up to App
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Key hints shown in the status bar while focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}
