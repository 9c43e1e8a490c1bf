//! Provider Sources
//!
//! Trait seams and HTTP implementations for the external travel data
//! services. Tools depend only on the traits, so tests and demos swap in
//! the mock sources without touching the network.

mod duckduckgo;
mod exchange_rate;
mod holiday_api;
mod mock;
mod weather_api;

pub use duckduckgo::DuckDuckGoSource;
pub use exchange_rate::ExchangeRateSource;
pub use holiday_api::HolidayApiSource;
pub use mock::{MockHolidaySource, MockRateSource, MockSearchSource, MockWeatherSource};
pub use weather_api::WeatherApiSource;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::model::{Forecast, Holiday, SearchHit};

/// Default per-request timeout for all provider HTTP calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transient failures are retried this many times after the first attempt
const MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff between attempts
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Weather forecast lookups
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Forecast for a city: current conditions plus `days` daily entries
    /// starting today, chronological
    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast>;
}

/// Currency exchange rate lookups
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Exchange rate for one unit of `from` in `to`, with the upstream's
    /// last-refresh timestamp
    async fn pair_rate(&self, from: &str, to: &str) -> Result<(Decimal, DateTime<Utc>)>;
}

/// Public holiday lookups
#[async_trait]
pub trait HolidaySource: Send + Sync {
    /// Public holidays in `country` falling on `date`. An empty list is a
    /// normal answer, not an error.
    async fn holidays_on(&self, country: &str, date: NaiveDate) -> Result<Vec<Holiday>>;
}

/// Web search lookups
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Top hits for a query, best first. A query matching nothing yields
    /// `Err(ProviderError::EmptyResult)`.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Build an HTTP client with the provider timeout applied
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Send a request, retrying transient failures with exponential backoff.
///
/// Retries cover connect errors, timeouts, HTTP 429, and 5xx. Any other
/// response passes through to the caller for provider-specific handling,
/// including non-success statuses that carry structured error bodies.
pub(crate) async fn send_with_retry(request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let mut retry_count = 0u32;

    loop {
        let attempt = match request.try_clone() {
            Some(builder) => builder,
            // Streaming bodies cannot be replayed; send once without retry.
            None => return Ok(request.send().await?),
        };

        match attempt.send().await {
            Ok(response) => {
                let status = response.status();
                let transient = status.is_server_error() || status.as_u16() == 429;

                if !transient {
                    return Ok(response);
                }
                if retry_count >= MAX_RETRIES {
                    return Err(ProviderError::Unavailable(format!(
                        "upstream returned {} after {} attempts",
                        status,
                        retry_count + 1
                    )));
                }
                tracing::warn!(status = %status, retry = retry_count + 1, "retrying upstream request");
            }
            Err(err) => {
                let err = ProviderError::from(err);
                if !err.is_retryable() || retry_count >= MAX_RETRIES {
                    return Err(err);
                }
                tracing::warn!(error = %err, retry = retry_count + 1, "retrying upstream request");
            }
        }

        // Backoff: 500ms, 1s, ...
        tokio::time::sleep(BACKOFF_BASE * (1 << retry_count)).await;
        retry_count += 1;
    }
}
