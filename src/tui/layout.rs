/// Responsive breakpoints for dashboard layout decisions.
///
/// Single source of truth for width thresholds.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 80 cols: panels stack vertically, stage cards drop their headline
    Compact,
    /// 80-119 cols: feed beside a side column
    Normal,
    /// 120+ cols: full labels in the status bar
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=79 => Breakpoint::Compact,
            80..=119 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }
}
