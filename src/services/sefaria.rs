//! Hebrew calendar highlights (Daf Yomi and the weekly Parasha)

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Language;

pub const PARASHA_TITLE: &str = "Parashat Hashavua";
pub const DAF_YOMI_TITLE: &str = "Daf Yomi";

#[derive(Debug, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub he: String,
}

impl LocalizedText {
    pub fn pick(&self, language: Language) -> &str {
        match language {
            Language::He => &self.he,
            Language::En => &self.en,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalendarItem {
    #[serde(default)]
    title: LocalizedText,
    #[serde(rename = "displayValue", default)]
    display_value: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct CalendarsResponse {
    calendar_items: Vec<CalendarItem>,
}

/// The two items the board shows; either may be absent from a response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarHighlights {
    pub parasha: Option<String>,
    pub daf_yomi: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SefariaClient {
    client: Client,
    endpoint: String,
}

impl SefariaClient {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub async fn fetch(&self, language: Language) -> Result<CalendarHighlights> {
        debug!("Fetching calendar highlights from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .context("Network error during calendar fetch")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Calendar fetch failed with HTTP status {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read calendar response body")?;

        parse_calendar(&body, language)
    }
}

/// Pick the Parasha and Daf Yomi items by exact English title
pub fn parse_calendar(body: &str, language: Language) -> Result<CalendarHighlights> {
    let response: CalendarsResponse =
        serde_json::from_str(body).context("Calendar response is not valid JSON")?;

    let value_for = |title: &str| {
        response
            .calendar_items
            .iter()
            .find(|item| item.title.en == title)
            .map(|item| item.display_value.pick(language).to_string())
            .filter(|value| !value.is_empty())
    };

    Ok(CalendarHighlights {
        parasha: value_for(PARASHA_TITLE),
        daf_yomi: value_for(DAF_YOMI_TITLE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "date": "2026-03-10",
        "timezone": "America/New_York",
        "calendar_items": [
            {"title": {"en": "Parashat Hashavua", "he": "פרשת השבוע"},
             "displayValue": {"en": "Vayakhel-Pekudei", "he": "ויקהל-פקודי"},
             "url": "Exodus.35.1-40.38"},
            {"title": {"en": "Haftarah", "he": "הפטרה"},
             "displayValue": {"en": "I Kings 7:40-50", "he": "מלכים א ז׳:מ׳-נ׳"}},
            {"title": {"en": "Daf Yomi", "he": "דף יומי"},
             "displayValue": {"en": "Chullin 52", "he": "חולין נב"}}
        ]
    }"#;

    #[test]
    fn extracts_both_items_in_hebrew() {
        let highlights = parse_calendar(BODY, Language::He).unwrap();
        assert_eq!(highlights.parasha.as_deref(), Some("ויקהל-פקודי"));
        assert_eq!(highlights.daf_yomi.as_deref(), Some("חולין נב"));
    }

    #[test]
    fn extracts_both_items_in_english() {
        let highlights = parse_calendar(BODY, Language::En).unwrap();
        assert_eq!(highlights.parasha.as_deref(), Some("Vayakhel-Pekudei"));
        assert_eq!(highlights.daf_yomi.as_deref(), Some("Chullin 52"));
    }

    #[test]
    fn title_match_is_exact() {
        let body = r#"{"calendar_items":[
            {"title":{"en":"Daf Yomi (Yerushalmi)","he":""},"displayValue":{"en":"Berakhot 3","he":""}}
        ]}"#;
        let highlights = parse_calendar(body, Language::En).unwrap();
        assert_eq!(highlights, CalendarHighlights::default());
    }

    #[test]
    fn missing_item_list_fails() {
        assert!(parse_calendar(r#"{"date":"2026-03-10"}"#, Language::He).is_err());
    }
}
