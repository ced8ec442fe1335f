//! Sunrise/sunset provider client

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::state::TargetTimes;

#[derive(Debug, Deserialize)]
struct SunResponse {
    /// An object on success; the provider sends `""` alongside an error status
    #[serde(default)]
    results: serde_json::Value,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SunResults {
    sunrise: Option<String>,
    sunset: Option<String>,
}

/// Fetches sunrise and sunset for a fixed location
#[derive(Debug, Clone)]
pub struct SunClient {
    client: Client,
    endpoint: String,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

impl SunClient {
    pub fn new(client: Client, endpoint: String, latitude: f64, longitude: f64, timezone: Tz) -> Self {
        Self {
            client,
            endpoint,
            latitude,
            longitude,
            timezone,
        }
    }

    pub async fn fetch(&self, date: NaiveDate) -> Result<TargetTimes> {
        let date_param = date.format("%Y-%m-%d").to_string();
        debug!("Fetching sunrise/sunset for {} from {}", date_param, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", self.latitude.to_string()),
                ("lng", self.longitude.to_string()),
                ("date", date_param),
                ("tzid", self.timezone.name().to_string()),
            ])
            .send()
            .await
            .context("Network error during sunrise/sunset fetch")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Sunrise/sunset fetch failed with HTTP status {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read sunrise/sunset response body")?;

        let times = parse_sun_response(&body, date, self.timezone)?;
        info!("Fetched sunrise {} and sunset {} for {}", times.sunrise, times.sunset, date);
        Ok(times)
    }
}

/// Decode a provider body into target times for `date` in `timezone`
pub fn parse_sun_response(body: &str, date: NaiveDate, timezone: Tz) -> Result<TargetTimes> {
    let response: SunResponse =
        serde_json::from_str(body).context("Sunrise/sunset response is not valid JSON")?;

    if let Some(status) = response.status.as_deref() {
        if status != "OK" {
            bail!("Sunrise/sunset provider reported status {}", status);
        }
    }

    if !response.results.is_object() {
        bail!("Sunrise/sunset response has no results");
    }
    let results: SunResults = serde_json::from_value(response.results)
        .context("Sunrise/sunset results are malformed")?;
    let sunrise = results
        .sunrise
        .ok_or_else(|| anyhow!("Sunrise/sunset response has no sunrise"))?;
    let sunset = results
        .sunset
        .ok_or_else(|| anyhow!("Sunrise/sunset response has no sunset"))?;

    Ok(TargetTimes::new(
        date,
        localize(date, parse_time_of_day(&sunrise)?, timezone)?,
        localize(date, parse_time_of_day(&sunset)?, timezone)?,
    ))
}

/// Accepts `6:12:03 AM`, `6:12 AM`, `06:12:03` and `06:12`
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    ["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| anyhow!("Unrecognised time of day '{}'", value))
}

fn localize(date: NaiveDate, time: NaiveTime, timezone: Tz) -> Result<chrono::DateTime<Tz>> {
    timezone
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| anyhow!("{} {} does not exist in {}", date, time, timezone.name()))
}
