//! Configuration and CLI argument handling

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::state::Field;

pub const DEFAULT_SUN_API: &str = "https://api.sunrise-sunset.org/json";
pub const DEFAULT_CALENDAR_API: &str = "https://www.sefaria.org/api/calendars";
pub const DEFAULT_CONVERTER_API: &str = "https://www.hebcal.com/converter";

/// Language used for calendar values and the fixed markers on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    He,
    En,
}

impl Language {
    /// Shown in every field whose data could not be fetched
    pub fn error_marker(self) -> &'static str {
        match self {
            Language::He => "שגיאה",
            Language::En => "Error",
        }
    }

    /// Shown in a countdown field once its target has been reached
    pub fn time_passed(self) -> &'static str {
        match self {
            Language::He => "הזמן עבר",
            Language::En => "Time passed",
        }
    }

    /// Shown before the first fetch completes
    pub fn loading(self) -> &'static str {
        "..."
    }
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "zmanim-countdown")]
#[command(about = "A clock and sunrise/sunset countdown board driven by zmanim lookups")]
#[command(version)]
pub struct Config {
    /// Port to bind the board server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Latitude of the location the zmanim are computed for
    #[arg(long, default_value = "31.7683", allow_hyphen_values = true)]
    pub latitude: f64,

    /// Longitude of the location the zmanim are computed for
    #[arg(long, default_value = "35.2137", allow_hyphen_values = true)]
    pub longitude: f64,

    /// IANA timezone of the location
    #[arg(short = 'z', long, default_value = "Asia/Jerusalem", value_parser = parse_timezone)]
    pub timezone: Tz,

    /// Language for calendar values and markers
    #[arg(short, long, value_enum, default_value_t = Language::He)]
    pub language: Language,

    /// Sunrise/sunset provider endpoint
    #[arg(long, default_value = DEFAULT_SUN_API)]
    pub sun_api: String,

    /// Hebrew calendar highlights endpoint
    #[arg(long, default_value = DEFAULT_CALENDAR_API)]
    pub calendar_api: String,

    /// Hebrew date converter endpoint
    #[arg(long, default_value = DEFAULT_CONVERTER_API)]
    pub converter_api: String,

    /// Remove a field from the board (repeatable)
    #[arg(long = "hide", value_enum)]
    pub hidden_fields: Vec<Field>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_timezone(value: &str) -> Result<Tz, String> {
    value
        .parse::<Tz>()
        .map_err(|e| format!("Unknown timezone '{}': {}", value, e))
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
