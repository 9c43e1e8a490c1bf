//! Domain Models
//!
//! Core data types for travel lookups. Currency math uses `rust_decimal`
//! so converted amounts never pick up binary-float noise.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weather forecast for one location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Forecast {
    /// Resolved location name (e.g., "Lisbon")
    pub location: String,

    /// Country of the resolved location
    pub country: String,

    /// Current temperature in Celsius
    pub current_temp_c: f64,

    /// Current condition text (e.g., "Partly cloudy")
    pub current_condition: String,

    /// Per-day forecast, chronological, exactly as many days as requested
    pub days: Vec<DayForecast>,
}

/// Forecast for a single day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DayForecast {
    /// Calendar date
    pub date: NaiveDate,

    /// Daily high in Celsius
    pub high_c: f64,

    /// Daily low in Celsius
    pub low_c: f64,

    /// Condition text
    pub condition: String,

    /// Chance of rain, 0..=100
    pub rain_chance: u8,
}

/// One currency conversion at a quoted rate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversion {
    /// Amount in the source currency
    pub amount: Decimal,

    /// ISO 4217 source code (e.g., "USD")
    pub from: String,

    /// ISO 4217 target code (e.g., "JPY")
    pub to: String,

    /// Quoted exchange rate (target per unit of source)
    pub rate: Decimal,

    /// `amount * rate`, rounded to 2 decimal places
    pub converted_amount: Decimal,

    /// When the upstream last refreshed the rate
    pub as_of: DateTime<Utc>,
}

impl Conversion {
    pub fn new(
        amount: Decimal,
        from: impl Into<String>,
        to: impl Into<String>,
        rate: Decimal,
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            from: from.into(),
            to: to.into(),
            rate,
            converted_amount: (amount * rate).round_dp(2),
            as_of,
        }
    }
}

/// A public holiday on a specific date
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holiday {
    /// Holiday name (e.g., "Bastille Day")
    pub name: String,

    /// Date the holiday falls on
    pub date: NaiveDate,

    /// Upstream classification (e.g., "National", "Religious")
    pub kind: Option<String>,
}

/// One web search result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title or topic
    pub title: String,

    /// Snippet of the matching content
    pub snippet: String,

    /// Source URL, when the engine provides one
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn conversion_multiplies_and_rounds() {
        let conv = Conversion::new(dec!(250.00), "USD", "JPY", dec!(147.3182), Utc::now());
        assert_eq!(conv.converted_amount, dec!(36829.55));
        assert_eq!(conv.rate, dec!(147.3182));
    }

    #[test]
    fn conversion_of_small_amounts_keeps_two_places() {
        let conv = Conversion::new(dec!(0.01), "EUR", "USD", dec!(1.0842), Utc::now());
        assert_eq!(conv.converted_amount, dec!(0.01));
    }
}
