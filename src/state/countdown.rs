//! Pure countdown evaluation
//!
//! Everything here is a function of the remaining time and the target, so the
//! tick task only has to compute `target - now` and write the result.

use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Serialize;

use super::Mode;

/// Countdowns further out than this show the placeholder
pub const DISPLAY_WINDOW_MS: i64 = 90 * 60 * 1000;
pub const WARNING_THRESHOLD_MS: i64 = 300_000;
pub const CRITICAL_THRESHOLD_MS: i64 = 120_000;

/// Pause between "time passed" and flipping to the other target
pub const GRACE_PERIOD: StdDuration = StdDuration::from_secs(5);
pub const TICK_INTERVAL: StdDuration = StdDuration::from_secs(1);

/// Neutral text for a countdown field that is not live
pub const PLACEHOLDER: &str = "--:--:--";

/// Urgency colour of a countdown field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTier {
    Default(Mode),
    Warning,
    Critical,
}

impl ColorTier {
    pub fn for_remaining(remaining_ms: i64, mode: Mode) -> Self {
        if remaining_ms <= CRITICAL_THRESHOLD_MS {
            ColorTier::Critical
        } else if remaining_ms <= WARNING_THRESHOLD_MS {
            ColorTier::Warning
        } else {
            ColorTier::Default(mode)
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ColorTier::Default(Mode::TowardSunrise) => "#f5b700",
            ColorTier::Default(Mode::TowardSunset) => "#ff7f11",
            ColorTier::Warning => "#ffa500",
            ColorTier::Critical => "#ff0000",
        }
    }
}

/// What one tick should put on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownView {
    /// Target reached; stop ticking
    Expired,
    /// More than the display window away
    Distant,
    Live { text: String, tier: ColorTier },
}

impl CountdownView {
    pub fn evaluate(remaining: Duration, mode: Mode) -> Self {
        let remaining_ms = remaining.num_milliseconds();
        if remaining_ms <= 0 {
            CountdownView::Expired
        } else if remaining_ms > DISPLAY_WINDOW_MS {
            CountdownView::Distant
        } else {
            CountdownView::Live {
                text: format_remaining(remaining_ms),
                tier: ColorTier::for_remaining(remaining_ms, mode),
            }
        }
    }
}

/// `HH:MM:SS`, truncating partial seconds
pub fn format_remaining(remaining_ms: i64) -> String {
    let total_seconds = remaining_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
