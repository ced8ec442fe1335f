//! Which target currently drives the visible countdown

use serde::{Deserialize, Serialize};

use super::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    TowardSunrise,
    TowardSunset,
}

impl Mode {
    pub fn other(self) -> Self {
        match self {
            Mode::TowardSunrise => Mode::TowardSunset,
            Mode::TowardSunset => Mode::TowardSunrise,
        }
    }

    /// Board field that shows this mode's countdown
    pub fn countdown_field(self) -> Field {
        match self {
            Mode::TowardSunrise => Field::SunriseCountdown,
            Mode::TowardSunset => Field::SunsetCountdown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::TowardSunrise => "sunrise",
            Mode::TowardSunset => "sunset",
        }
    }
}
