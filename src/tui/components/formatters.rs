// Formatters shared by dashboard panels

use chrono::{DateTime, Utc};

/// Format a number compactly with K/M suffixes
pub fn format_compact_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Seconds until the next cycle, as "12s" or "1m05s"
///
/// Returns None when no cycle is scheduled. A deadline in the past reads "now".
pub fn format_countdown(next: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<String> {
    let remaining = (next? - now).num_seconds();
    if remaining <= 0 {
        return Some("now".to_string());
    }
    if remaining < 60 {
        Some(format!("{}s", remaining))
    } else {
        Some(format!("{}m{:02}s", remaining / 60, remaining % 60))
    }
}

/// Local clock time for list rows
pub fn format_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local).format("%H:%M:%S").to_string()
}
