//! The display surface: a fixed set of named text/style fields

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named targets on the board
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ClockTime,
    Date,
    Sunrise,
    Sunset,
    Dawn,
    SunriseCountdown,
    SunsetCountdown,
    HebrewDate,
    DafYomi,
    Parasha,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::ClockTime,
        Field::Date,
        Field::Sunrise,
        Field::Sunset,
        Field::Dawn,
        Field::SunriseCountdown,
        Field::SunsetCountdown,
        Field::HebrewDate,
        Field::DafYomi,
        Field::Parasha,
    ];

    /// Fields that depend on a successful sunrise/sunset fetch
    pub const ZMANIM: [Field; 5] = [
        Field::Sunrise,
        Field::Sunset,
        Field::Dawn,
        Field::SunriseCountdown,
        Field::SunsetCountdown,
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldValue {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Analog clock hand angles in degrees, clockwise from twelve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    pub fn at(time: NaiveTime) -> Self {
        let hours = f64::from(time.hour() % 12);
        let minutes = f64::from(time.minute());
        let seconds = f64::from(time.second());
        Self {
            hour: (hours * 60.0 + minutes) / 2.0,
            minute: (minutes * 60.0 + seconds) / 10.0,
            second: seconds * 6.0,
        }
    }
}

/// Everything a front end needs to draw the board
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub fields: BTreeMap<Field, FieldValue>,
    pub hands: HandAngles,
}

impl DisplaySnapshot {
    pub fn text(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(|value| value.text.as_str())
    }
}

/// In-memory board; each field is written independently
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    fields: BTreeMap<Field, FieldValue>,
    hands: HandAngles,
}

impl DisplayBoard {
    /// Board with every field except `hidden`, each showing `initial`
    pub fn new(hidden: &[Field], initial: &str) -> Self {
        let fields = Field::ALL
            .iter()
            .filter(|field| !hidden.contains(*field))
            .map(|field| {
                (
                    *field,
                    FieldValue {
                        text: initial.to_string(),
                        color: None,
                    },
                )
            })
            .collect();

        Self {
            fields,
            hands: HandAngles::default(),
        }
    }

    /// Write a field. Fails if the board has no such target.
    pub fn set(&mut self, field: Field, text: &str, color: Option<&str>) -> Result<(), String> {
        let value = self
            .fields
            .get_mut(&field)
            .ok_or_else(|| format!("Display target {:?} is not on the board", field))?;
        value.text = text.to_string();
        value.color = color.map(str::to_string);
        Ok(())
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn set_hands(&mut self, hands: HandAngles) {
        self.hands = hands;
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            fields: self.fields.clone(),
            hands: self.hands,
        }
    }
}
