//! Fetched target times for one calendar day

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use super::Mode;

/// Alot Hashahar is approximated as a fixed offset before sunrise
pub const DAWN_OFFSET_MINUTES: i64 = 72;

/// Sunrise and sunset for `date`, in the location's timezone.
///
/// `sunrise <= sunset` is assumed but not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTimes {
    pub date: NaiveDate,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

impl TargetTimes {
    pub fn new(date: NaiveDate, sunrise: DateTime<Tz>, sunset: DateTime<Tz>) -> Self {
        Self { date, sunrise, sunset }
    }

    /// Derived from sunrise on every call, never stored
    pub fn dawn(&self) -> DateTime<Tz> {
        self.sunrise - Duration::minutes(DAWN_OFFSET_MINUTES)
    }

    pub fn target(&self, mode: Mode) -> DateTime<Tz> {
        match mode {
            Mode::TowardSunrise => self.sunrise,
            Mode::TowardSunset => self.sunset,
        }
    }

    /// The day after the one these times belong to
    pub fn next_date(&self) -> NaiveDate {
        self.date.succ_opt().unwrap_or(self.date)
    }
}
