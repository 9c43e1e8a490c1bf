//! Mock Sources
//!
//! For testing and demo purposes. Deterministic static data, no network.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{HolidaySource, RateSource, SearchSource, WeatherSource};
use crate::error::{ProviderError, Result};
use crate::model::{DayForecast, Forecast, Holiday, SearchHit};

/// Mock weather source with a small city table
pub struct MockWeatherSource;

impl MockWeatherSource {
    /// (country, base_temp_c, condition, rain_chance)
    fn city_data(city: &str) -> Option<(&'static str, f64, &'static str, u8)> {
        match city.to_lowercase().as_str() {
            "lisbon" => Some(("Portugal", 24.5, "Sunny", 10)),
            "oslo" => Some(("Norway", 11.0, "Overcast", 60)),
            "jaipur" => Some(("India", 31.0, "Partly cloudy", 20)),
            "kyoto" => Some(("Japan", 27.5, "Light rain", 75)),
            "paris" => Some(("France", 19.0, "Cloudy", 40)),
            _ => None,
        }
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast> {
        let (country, base_temp, condition, rain_chance) = Self::city_data(city)
            .ok_or_else(|| ProviderError::UnknownLocation(city.to_string()))?;

        let today = Utc::now().date_naive();
        let day_forecasts = (0..days)
            .map(|i| DayForecast {
                date: today + chrono::Days::new(u64::from(i)),
                high_c: base_temp + 3.0 - f64::from(i),
                low_c: base_temp - 6.0 - f64::from(i),
                condition: condition.to_string(),
                rain_chance,
            })
            .collect();

        Ok(Forecast {
            location: capitalize(city),
            country: country.to_string(),
            current_temp_c: base_temp,
            current_condition: condition.to_string(),
            days: day_forecasts,
        })
    }
}

/// Mock rate source quoting through a USD value table
pub struct MockRateSource;

impl MockRateSource {
    /// USD value of one unit of the currency
    fn usd_value(code: &str) -> Option<Decimal> {
        match code {
            "USD" => Some(dec!(1.0)),
            "EUR" => Some(dec!(1.08)),
            "GBP" => Some(dec!(1.27)),
            "JPY" => Some(dec!(0.0068)),
            "INR" => Some(dec!(0.012)),
            "CHF" => Some(dec!(1.11)),
            "AUD" => Some(dec!(0.66)),
            _ => None,
        }
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn pair_rate(&self, from: &str, to: &str) -> Result<(Decimal, DateTime<Utc>)> {
        let from_usd = Self::usd_value(from)
            .ok_or_else(|| ProviderError::UnsupportedCurrency(from.to_string()))?;
        let to_usd = Self::usd_value(to)
            .ok_or_else(|| ProviderError::UnsupportedCurrency(to.to_string()))?;

        Ok((from_usd / to_usd, Utc::now()))
    }
}

/// Mock holiday source with a handful of fixed national days
pub struct MockHolidaySource;

#[async_trait]
impl HolidaySource for MockHolidaySource {
    async fn holidays_on(&self, country: &str, date: NaiveDate) -> Result<Vec<Holiday>> {
        let name = match (country, date.month(), date.day()) {
            ("FR", 7, 14) => Some("Bastille Day"),
            ("US", 7, 4) => Some("Independence Day"),
            ("IN", 8, 15) => Some("Independence Day"),
            ("NO", 5, 17) => Some("Constitution Day"),
            ("JP", 1, 1) => Some("New Year's Day"),
            _ => None,
        };

        Ok(name
            .map(|name| {
                vec![Holiday {
                    name: name.to_string(),
                    date,
                    kind: Some("National".to_string()),
                }]
            })
            .unwrap_or_default())
    }
}

/// Mock search source returning canned hits, or nothing at all
pub struct MockSearchSource {
    empty: bool,
}

impl Default for MockSearchSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearchSource {
    pub fn new() -> Self {
        Self { empty: false }
    }

    /// A source whose every query matches nothing
    pub fn empty() -> Self {
        Self { empty: true }
    }
}

#[async_trait]
impl SearchSource for MockSearchSource {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if self.empty {
            return Err(ProviderError::EmptyResult);
        }

        Ok(vec![
            SearchHit {
                title: format!("All about {}", query),
                snippet: format!("{} explained in depth, with history and context.", query),
                url: Some("https://en.wikipedia.org/wiki/Example".to_string()),
            },
            SearchHit {
                title: format!("{} travel guide", query),
                snippet: format!("Practical tips for {}.", query),
                url: Some("https://example.com/guide".to_string()),
            },
            SearchHit {
                title: format!("Latest news on {}", query),
                snippet: format!("Recent coverage related to {}.", query),
                url: None,
            },
        ])
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn weather_gives_requested_day_count() {
        let source = MockWeatherSource;
        let forecast = source.forecast("Lisbon", 3).await.unwrap();

        assert_eq!(forecast.location, "Lisbon");
        assert_eq!(forecast.country, "Portugal");
        assert_eq!(forecast.days.len(), 3);
        // Chronological from today
        assert!(forecast.days[0].date < forecast.days[1].date);
    }

    #[tokio::test]
    async fn unknown_city_is_rejected() {
        let source = MockWeatherSource;
        let err = source.forecast("Atlantis", 2).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownLocation(_)));
    }

    #[tokio::test]
    async fn rates_invert_consistently() {
        let source = MockRateSource;
        let (usd_jpy, _) = source.pair_rate("USD", "JPY").await.unwrap();
        let (jpy_usd, _) = source.pair_rate("JPY", "USD").await.unwrap();

        let product = usd_jpy * jpy_usd;
        let tolerance = dec!(0.0001);
        assert!((product - Decimal::ONE).abs() < tolerance);
    }

    #[tokio::test]
    async fn holiday_table_hits_and_misses() {
        let source = MockHolidaySource;
        let bastille = NaiveDate::from_ymd_opt(2026, 7, 14).unwrap();
        let ordinary = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        let hit = source.holidays_on("FR", bastille).await.unwrap();
        assert_eq!(hit[0].name, "Bastille Day");

        let miss = source.holidays_on("FR", ordinary).await.unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn empty_search_source_yields_empty_result() {
        let source = MockSearchSource::empty();
        let err = source.search("anything").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResult));
    }
}
