// Dashboard color themes
//
// Selected by name from config (`theme = "dark"`); unknown names fall back
// to dark. Each theme defines colors for every dashboard element.

use crate::model::LogSeverity;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Neon,
}

impl ThemeKind {
    /// Resolve a configured theme name, case-insensitive
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            "neon" => ThemeKind::Neon,
            _ => ThemeKind::Dark,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Neon => Theme::neon(),
        }
    }
}

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub border_type: BorderType,

    pub title: Color,
    pub status_bar: Color,

    pub selected_bg: Color,
    pub selected_fg: Color,

    // Stage cards
    pub stage_active: Color,
    pub stage_idle: Color,

    // Loop log severities
    pub info: Color,
    pub success: Color,
    pub warning: Color,

    // System log levels
    pub log_error: Color,
    pub log_debug: Color,

    pub chart: Color,
    pub source: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            border_type: BorderType::Rounded,

            title: Color::Cyan,
            status_bar: Color::Green,

            selected_bg: Color::DarkGray,
            selected_fg: Color::Yellow,

            stage_active: Color::Cyan,
            stage_idle: Color::Gray,

            info: Color::LightBlue,
            success: Color::Green,
            warning: Color::Yellow,

            log_error: Color::Red,
            log_debug: Color::Gray,

            chart: Color::Magenta,
            source: Color::LightCyan,
            accent: Color::LightMagenta,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            border_type: BorderType::Plain,

            title: Color::Blue,
            status_bar: Color::DarkGray,

            selected_bg: Color::LightBlue,
            selected_fg: Color::Black,

            stage_active: Color::Blue,
            stage_idle: Color::DarkGray,

            info: Color::Blue,
            success: Color::Green,
            warning: Color::Rgb(184, 134, 11),

            log_error: Color::Red,
            log_debug: Color::DarkGray,

            chart: Color::Magenta,
            source: Color::Blue,
            accent: Color::Magenta,
        }
    }

    pub fn neon() -> Self {
        Self {
            fg: Color::Rgb(235, 235, 255),
            muted: Color::Rgb(110, 100, 150),
            border: Color::Rgb(90, 60, 160),
            border_focused: Color::Rgb(255, 0, 200),
            border_type: BorderType::Double,

            title: Color::Rgb(0, 255, 230),
            status_bar: Color::Rgb(0, 255, 160),

            selected_bg: Color::Rgb(60, 0, 90),
            selected_fg: Color::Rgb(255, 240, 0),

            stage_active: Color::Rgb(255, 0, 200),
            stage_idle: Color::Rgb(110, 100, 150),

            info: Color::Rgb(0, 200, 255),
            success: Color::Rgb(0, 255, 160),
            warning: Color::Rgb(255, 200, 0),

            log_error: Color::Rgb(255, 60, 90),
            log_debug: Color::Rgb(110, 100, 150),

            chart: Color::Rgb(255, 0, 200),
            source: Color::Rgb(0, 255, 230),
            accent: Color::Rgb(255, 120, 255),
        }
    }

    /// Color for a loop log severity
    pub fn severity(&self, severity: LogSeverity) -> Color {
        match severity {
            LogSeverity::Info => self.info,
            LogSeverity::Success => self.success,
            LogSeverity::Warning => self.warning,
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn panel_border(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_resolve() {
        assert_eq!(ThemeKind::from_name("dark"), ThemeKind::Dark);
        assert_eq!(ThemeKind::from_name(" Neon "), ThemeKind::Neon);
        assert_eq!(ThemeKind::from_name("LIGHT"), ThemeKind::Light);
        assert_eq!(ThemeKind::from_name("solarized"), ThemeKind::Dark);
    }

    #[test]
    fn severity_colors_differ() {
        let theme = Theme::dark();
        assert_ne!(
            theme.severity(LogSeverity::Success),
            theme.severity(LogSeverity::Warning)
        );
    }
}
