// Scroll state for TUI panels
//
// Each panel owns its ScrollState; App only routes input to the focused one.
// The feed lists newest items first, so it anchors to the top. The system log
// panel lists oldest first and follows the bottom while new entries arrive.

/// Scroll state for a single panel
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Index of the item at the top of the viewport
    offset: usize,

    /// Total number of items in content
    total: usize,

    /// Number of items visible in viewport
    viewport: usize,

    /// Keep the view pinned to the bottom as content grows
    ///
    /// Scrolling up disables it; reaching the bottom re-enables it.
    pub auto_follow: bool,

    /// Whether this panel follows the bottom at all
    follows_bottom: bool,
}

impl ScrollState {
    /// Scroll state that follows new content at the bottom
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
            follows_bottom: true,
        }
    }

    /// Scroll state anchored to the top (newest-first lists)
    pub fn manual() -> Self {
        Self {
            auto_follow: false,
            follows_bottom: false,
            ..Self::new()
        }
    }

    /// Update content and viewport dimensions, called every frame
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
        self.auto_follow = false;
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_follow = false;
    }

    /// Jump to bottom and resume following
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = self.follows_bottom;
    }

    /// Scroll the minimum amount that brings `index` into view
    pub fn ensure_visible(&mut self, index: usize) {
        if index < self.offset {
            self.offset = index;
        } else if self.viewport > 0 && index >= self.offset + self.viewport {
            self.offset = index + 1 - self.viewport;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible range as (start, end), end exclusive
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end.max(start))
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Panels that can take keyboard focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusablePanel {
    /// Content feed (default focus)
    #[default]
    Feed,
    /// System logs panel
    Logs,
}

impl FocusablePanel {
    pub fn next(self) -> Self {
        match self {
            Self::Feed => Self::Logs,
            Self::Logs => Self::Feed,
        }
    }
}
