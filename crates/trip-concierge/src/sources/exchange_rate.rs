//! ExchangeRate-API Source
//!
//! Pair-rate lookups against the v6 ExchangeRate-API. The API reports
//! outcomes in the body's `result` field, so classification reads the
//! body regardless of HTTP status.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::{http_client, send_with_retry, RateSource, DEFAULT_TIMEOUT};
use crate::error::{ProviderError, Result};

const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

pub struct ExchangeRateSource {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ExchangeRateSource {
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
impl RateSource for ExchangeRateSource {
    async fn pair_rate(&self, from: &str, to: &str) -> Result<(Decimal, DateTime<Utc>)> {
        let url = format!("{}/{}/pair/{}/{}", self.base_url, self.api_key, from, to);
        let response = send_with_retry(self.client.get(&url)).await?;
        let body = response.text().await?;

        parse_pair(&body, from, to)
    }
}

fn parse_pair(body: &str, from: &str, to: &str) -> Result<(Decimal, DateTime<Utc>)> {
    let api: ApiResponse = serde_json::from_str(body)?;

    match api.result.as_str() {
        "success" => {
            let rate = api
                .conversion_rate
                .ok_or_else(|| ProviderError::Malformed("missing conversion_rate".into()))?;
            let as_of = api
                .time_last_update_unix
                .and_then(|unix| DateTime::from_timestamp(unix, 0))
                .ok_or_else(|| ProviderError::Malformed("missing time_last_update_unix".into()))?;
            Ok((rate, as_of))
        }
        "error" => Err(classify_error(api.error_type.as_deref(), from, to)),
        other => Err(ProviderError::Malformed(format!(
            "unexpected result value '{}'",
            other
        ))),
    }
}

fn classify_error(error_type: Option<&str>, from: &str, to: &str) -> ProviderError {
    match error_type {
        Some("unsupported-code") => ProviderError::UnsupportedCurrency(format!("{}/{}", from, to)),
        Some(kind @ ("invalid-key" | "inactive-account")) => {
            ProviderError::Config(format!("exchange rate API key rejected: {}", kind))
        }
        Some("malformed-request") => ProviderError::Malformed("malformed pair request".into()),
        Some(other) => ProviderError::Unavailable(format!("exchange rate service error: {}", other)),
        None => ProviderError::Unavailable("exchange rate service error".into()),
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct ApiResponse {
    result: String,

    #[serde(rename = "error-type", default)]
    error_type: Option<String>,

    #[serde(default)]
    conversion_rate: Option<Decimal>,

    #[serde(default)]
    time_last_update_unix: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_success_payload() {
        let body = r#"{
            "result": "success",
            "base_code": "USD",
            "target_code": "JPY",
            "conversion_rate": 147.3182,
            "time_last_update_unix": 1755907201
        }"#;

        let (rate, as_of) = parse_pair(body, "USD", "JPY").unwrap();
        assert_eq!(rate, dec!(147.3182));
        assert_eq!(as_of.timestamp(), 1755907201);
    }

    #[test]
    fn unsupported_code_names_the_pair() {
        let body = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let err = parse_pair(body, "USD", "XXX").unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedCurrency(pair) if pair == "USD/XXX"));
    }

    #[test]
    fn quota_errors_are_unavailable() {
        let body = r#"{"result": "error", "error-type": "quota-reached"}"#;
        let err = parse_pair(body, "USD", "EUR").unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn rejected_key_is_a_config_error() {
        let body = r#"{"result": "error", "error-type": "invalid-key"}"#;
        let err = parse_pair(body, "USD", "EUR").unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[test]
    fn success_without_rate_is_malformed() {
        let body = r#"{"result": "success", "time_last_update_unix": 1755907201}"#;
        let err = parse_pair(body, "USD", "EUR").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
