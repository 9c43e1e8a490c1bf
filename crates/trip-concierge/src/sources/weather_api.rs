//! WeatherAPI.com Source
//!
//! Forecast lookups against the WeatherAPI `forecast.json` endpoint.
//! The upstream signals "no such city" with HTTP 400 and error code 1006
//! in the body; that maps to `UnknownLocation` rather than a retry.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use super::{http_client, send_with_retry, WeatherSource, DEFAULT_TIMEOUT};
use crate::error::{ProviderError, Result};
use crate::model::{DayForecast, Forecast};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Upstream error code for "no matching location found"
const CODE_NO_LOCATION: u32 = 1006;

pub struct WeatherApiSource {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiSource {
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
impl WeatherSource for WeatherApiSource {
    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast> {
        let url = format!("{}/forecast.json", self.base_url);
        let request = self.client.get(&url).query(&[
            ("key", self.api_key.as_str()),
            ("q", city),
            ("days", &days.to_string()),
        ]);

        let response = send_with_retry(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(&body, city, status.as_u16()));
        }

        parse_forecast(&body, days)
    }
}

/// Map a non-success body to the provider error taxonomy
fn classify_error(body: &str, city: &str, status: u16) -> ProviderError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.code == CODE_NO_LOCATION => {
            ProviderError::UnknownLocation(city.to_string())
        }
        Ok(envelope) => ProviderError::Unavailable(envelope.error.message),
        Err(_) => ProviderError::Unavailable(format!("weather service returned HTTP {}", status)),
    }
}

/// Parse a success body into the domain forecast.
///
/// The free tier silently caps the forecast window, so a response with
/// fewer days than requested is treated as unavailable instead of being
/// passed off as a complete answer. Extra days are truncated.
fn parse_forecast(body: &str, days: u8) -> Result<Forecast> {
    let api: ApiResponse = serde_json::from_str(body)?;

    let mut day_forecasts = Vec::with_capacity(days as usize);
    for entry in api.forecast.forecastday.into_iter().take(days as usize) {
        let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
            .map_err(|e| ProviderError::Malformed(format!("bad forecast date '{}': {}", entry.date, e)))?;
        day_forecasts.push(DayForecast {
            date,
            high_c: entry.day.maxtemp_c,
            low_c: entry.day.mintemp_c,
            condition: entry.day.condition.text,
            rain_chance: entry.day.daily_chance_of_rain,
        });
    }

    if day_forecasts.len() < days as usize {
        return Err(ProviderError::Unavailable(format!(
            "forecast window truncated: got {} of {} requested days",
            day_forecasts.len(),
            days
        )));
    }

    Ok(Forecast {
        location: api.location.name,
        country: api.location.country,
        current_temp_c: api.current.temp_c,
        current_condition: api.current.condition.text,
        days: day_forecasts,
    })
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct ApiResponse {
    location: ApiLocation,
    current: ApiCurrent,
    forecast: ApiForecast,
}

#[derive(Deserialize)]
struct ApiLocation {
    name: String,
    country: String,
}

#[derive(Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    condition: ApiCondition,
}

#[derive(Deserialize)]
struct ApiCondition {
    text: String,
}

#[derive(Deserialize)]
struct ApiForecast {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Deserialize)]
struct ApiForecastDay {
    date: String,
    day: ApiDay,
}

#[derive(Deserialize)]
struct ApiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    #[serde(default)]
    daily_chance_of_rain: u8,
    condition: ApiCondition,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: u32,
    message: String,
}
