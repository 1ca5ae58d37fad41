//! Scroll and selection behavior shared by list panels

use crate::tui::scroll::ScrollState;

/// Panels with scrollable content
///
/// Implementors expose their `ScrollState`; navigation delegates to it.
pub trait Scrollable {
    fn scroll_state_mut(&mut self) -> &mut ScrollState;

    fn scroll_to_top(&mut self) {
        self.scroll_state_mut().scroll_to_top();
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_state_mut().scroll_to_bottom();
    }

    fn page_up(&mut self) {
        self.scroll_state_mut().page_up();
    }

    fn page_down(&mut self) {
        self.scroll_state_mut().page_down();
    }
}

/// Panels whose items can be selected one at a time
pub trait Selectable: Scrollable {
    fn selected_index(&self) -> Option<usize>;

    fn set_selected(&mut self, index: Option<usize>);

    fn item_count(&self) -> usize;

    /// Move selection down one item, starting at the top
    fn select_next(&mut self) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let next = match self.selected_index() {
            Some(idx) => (idx + 1).min(count - 1),
            None => 0,
        };
        self.set_selected(Some(next));
        self.scroll_state_mut().ensure_visible(next);
    }

    /// Move selection up one item, starting at the top
    fn select_previous(&mut self) {
        if self.item_count() == 0 {
            return;
        }
        let prev = match self.selected_index() {
            Some(idx) => idx.saturating_sub(1),
            None => 0,
        };
        self.set_selected(Some(prev));
        self.scroll_state_mut().ensure_visible(prev);
    }
}
