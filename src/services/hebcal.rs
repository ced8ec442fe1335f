//! Gregorian to Hebrew date conversion

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Language;

#[derive(Debug, Deserialize)]
struct ConverterResponse {
    hebrew: Option<String>,
    hy: Option<i32>,
    hm: Option<String>,
    hd: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct HebcalClient {
    client: Client,
    endpoint: String,
}

impl HebcalClient {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub async fn fetch(&self, date: NaiveDate, language: Language) -> Result<String> {
        debug!("Converting {} to a Hebrew date via {}", date, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("cfg", "json".to_string()),
                ("gy", date.year().to_string()),
                ("gm", date.month().to_string()),
                ("gd", date.day().to_string()),
                ("g2h", "1".to_string()),
            ])
            .send()
            .await
            .context("Network error during Hebrew date fetch")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Hebrew date fetch failed with HTTP status {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read Hebrew date response body")?;

        parse_hebrew_date(&body, language)
    }
}

/// Hebrew text from `hebrew`, or `hd hm hy` in English
pub fn parse_hebrew_date(body: &str, language: Language) -> Result<String> {
    let response: ConverterResponse =
        serde_json::from_str(body).context("Hebrew date response is not valid JSON")?;

    match language {
        Language::He => response
            .hebrew
            .filter(|hebrew| !hebrew.is_empty())
            .ok_or_else(|| anyhow!("Hebrew date response has no hebrew field")),
        Language::En => match (response.hd, response.hm, response.hy) {
            (Some(day), Some(month), Some(year)) => Ok(format!("{} {} {}", day, month, year)),
            _ => Err(anyhow!("Hebrew date response has no hd/hm/hy fields")),
        },
    }
}
