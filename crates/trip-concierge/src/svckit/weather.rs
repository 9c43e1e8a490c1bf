//! Weather Forecast Tool
//!
//! Current conditions and a short daily outlook for a city.

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::sources::WeatherSource;

/// Longest forecast window the upstream free tier serves reliably
const MAX_DAYS: u8 = 3;
const DEFAULT_DAYS: u8 = 3;

/// Tool for looking up weather forecasts
pub struct WeatherForecastTool {
    source: Arc<dyn WeatherSource>,
}

impl WeatherForecastTool {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for WeatherForecastTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "weather_forecast".into(),
            description: "Get the weather for a city: current conditions plus a 1-3 day outlook with highs, lows, and rain chance.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "city".into(),
                    param_type: "string".into(),
                    description: "City name (e.g., 'Lisbon')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "days".into(),
                    param_type: "integer".into(),
                    description: "Forecast days, 1 to 3".into(),
                    required: false,
                    default: Some(serde_json::json!(DEFAULT_DAYS)),
                    enum_values: None,
                },
            ],
            category: Some("travel".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let city = call
            .arguments
            .get("city")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if city.is_empty() {
            return Ok(ToolResult::failure("weather_forecast", "city must not be empty"));
        }

        let days = call
            .arguments
            .get("days")
            .and_then(|v| v.as_u64())
            .unwrap_or(u64::from(DEFAULT_DAYS));
        if days < 1 || days > u64::from(MAX_DAYS) {
            return Ok(ToolResult::failure(
                "weather_forecast",
                format!("days must be between 1 and {}", MAX_DAYS),
            ));
        }

        let forecast = match self.source.forecast(city, days as u8).await {
            Ok(forecast) => forecast,
            Err(e) => return Ok(ToolResult::failure("weather_forecast", e.to_string())),
        };

        let mut output = format!(
            "Weather for {}, {}\nNow: {:.1}C, {}\n",
            forecast.location, forecast.country, forecast.current_temp_c, forecast.current_condition
        );
        for day in &forecast.days {
            output.push_str(&format!(
                "  {}: high {:.1}C / low {:.1}C, {}, {}% rain\n",
                day.date, day.high_c, day.low_c, day.condition, day.rain_chance
            ));
        }

        let data = serde_json::to_value(&forecast)?;
        Ok(ToolResult::success("weather_forecast", output.trim_end()).with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockWeatherSource;
    use std::collections::HashMap;

    fn call(args: serde_json::Value) -> ToolCall {
        let arguments: HashMap<String, serde_json::Value> = args
            .as_object()
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        ToolCall {
            name: "weather_forecast".into(),
            arguments,
            id: None,
        }
    }

    fn tool() -> WeatherForecastTool {
        WeatherForecastTool::new(Arc::new(MockWeatherSource))
    }

    #[tokio::test]
    async fn returns_requested_days_in_order() {
        let result = tool()
            .execute(&call(serde_json::json!({"city": "Lisbon", "days": 3})))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("Weather for Lisbon, Portugal"));

        let data = result.data.unwrap();
        let days = data["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
        let mut sorted = dates.clone();
        sorted.sort_unstable();
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn days_defaults_to_three() {
        let result = tool()
            .execute(&call(serde_json::json!({"city": "Oslo"})))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["days"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn out_of_range_days_fail_without_lookup() {
        let result = tool()
            .execute(&call(serde_json::json!({"city": "Lisbon", "days": 7})))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("between 1 and 3"));
    }

    #[tokio::test]
    async fn unknown_city_reports_failure() {
        let result = tool()
            .execute(&call(serde_json::json!({"city": "Atlantis"})))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("unknown location"));
    }

    #[tokio::test]
    async fn blank_city_is_rejected() {
        let result = tool()
            .execute(&call(serde_json::json!({"city": "  "})))
            .await
            .unwrap();

        assert!(!result.success);
    }
}
