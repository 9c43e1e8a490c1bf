//! Error Types for Trip Concierge Providers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failure taxonomy shared by every external data provider.
///
/// `Unavailable` covers the transient cases (network, timeout, 5xx, rate
/// limit) that retries may fix; the rest are definitive answers from the
/// upstream service and are never retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),

    #[error("no results found")]
    EmptyResult,

    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Whether a retry could plausibly change the outcome
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Unavailable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Unavailable(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}
