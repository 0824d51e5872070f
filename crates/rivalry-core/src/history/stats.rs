//! Time-windowed usage statistics over the search history.

use serde::Serialize;

use super::HistoryEntry;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Activity in the window ending now versus the window before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowStats {
    pub current: usize,
    pub previous: usize,
    /// Percentage change from `previous` to `current`.
    pub trend: i64,
}

impl WindowStats {
    /// Renders the trend as shown next to the counter ("+100%", "-50%", "0%").
    pub fn trend_label(&self) -> String {
        if self.trend > 0 {
            format!("+{}%", self.trend)
        } else {
            format!("{}%", self.trend)
        }
    }
}

/// Counts entries in `[now - window, now)` and `[now - 2*window, now - window)`.
///
/// With no previous activity the trend is 100 when there is current activity
/// and 0 otherwise.
pub fn window_stats(history: &[HistoryEntry], window_ms: i64, now: i64) -> WindowStats {
    let mut current = 0;
    let mut previous = 0;
    for entry in history {
        // Stored timestamps are untrusted; extreme values must not overflow.
        let age = now.saturating_sub(entry.timestamp);
        if age < window_ms {
            current += 1;
        } else if age < window_ms.saturating_mul(2) {
            previous += 1;
        }
    }

    let trend = if previous > 0 {
        let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
        // Half-way values round up, matching the counters' display rounding.
        (change + 0.5).floor() as i64
    } else if current > 0 {
        100
    } else {
        0
    };

    WindowStats {
        current,
        previous,
        trend,
    }
}
