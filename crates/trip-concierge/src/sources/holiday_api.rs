//! AbstractAPI Holidays Source
//!
//! Day lookups against the AbstractAPI holidays endpoint. The upstream
//! answers with a JSON array; an empty array means "no holiday that day"
//! and is a normal result.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::time::Duration;

use super::{http_client, send_with_retry, HolidaySource, DEFAULT_TIMEOUT};
use crate::error::{ProviderError, Result};
use crate::model::Holiday;

const DEFAULT_BASE_URL: &str = "https://holidays.abstractapi.com/v1/";

pub struct HolidayApiSource {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HolidayApiSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Override the endpoint (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl HolidaySource for HolidayApiSource {
    async fn holidays_on(&self, country: &str, date: NaiveDate) -> Result<Vec<Holiday>> {
        let request = self.client.get(&self.base_url).query(&[
            ("api_key", self.api_key.as_str()),
            ("country", country),
            ("year", &date.year().to_string()),
            ("month", &date.month().to_string()),
            ("day", &date.day().to_string()),
        ]);

        let response = send_with_retry(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(&body, status.as_u16()));
        }

        parse_holidays(&body, date)
    }
}

fn classify_error(body: &str, status: u16) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("holiday service returned HTTP {}", status));

    match status {
        401 | 403 => ProviderError::Config(format!("holiday API key rejected: {}", message)),
        _ => ProviderError::Unavailable(message),
    }
}

fn parse_holidays(body: &str, date: NaiveDate) -> Result<Vec<Holiday>> {
    let entries: Vec<ApiHoliday> = serde_json::from_str(body)?;

    Ok(entries
        .into_iter()
        .map(|entry| Holiday {
            name: entry.name,
            date,
            kind: entry.kind.filter(|k| !k.is_empty()),
        })
        .collect())
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct ApiHoliday {
    name: String,

    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_holiday_array() {
        let body = r#"[
            {"name": "Bastille Day", "name_local": "", "language": "", "description": "",
             "country": "FR", "location": "France", "type": "National",
             "date": "07/14/2026", "date_year": "2026", "date_month": "07", "date_day": "14",
             "week_day": "Tuesday"}
        ]"#;

        let holidays = parse_holidays(body, date("2026-07-14")).unwrap();
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Bastille Day");
        assert_eq!(holidays[0].kind.as_deref(), Some("National"));
        assert_eq!(holidays[0].date, date("2026-07-14"));
    }

    #[test]
    fn empty_array_is_a_normal_answer() {
        let holidays = parse_holidays("[]", date("2026-03-03")).unwrap();
        assert!(holidays.is_empty());
    }

    #[test]
    fn object_body_is_malformed() {
        let err = parse_holidays(r#"{"unexpected": true}"#, date("2026-03-03")).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn unauthorized_is_a_config_error() {
        let body = r#"{"error": {"message": "Invalid API key provided."}}"#;
        let err = classify_error(body, 401);
        assert!(matches!(err, ProviderError::Config(msg) if msg.contains("Invalid API key")));
    }
}
