//! Holiday Lookup Tool
//!
//! Checks whether a date is a public holiday in a country. "No holiday"
//! is a successful answer, not an error.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::sources::HolidaySource;

/// Tool for public holiday lookups
pub struct HolidayLookupTool {
    source: Arc<dyn HolidaySource>,
}

impl HolidayLookupTool {
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for HolidayLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "holiday_lookup".into(),
            description: "Check for public holidays in a country on a specific date.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "country_code".into(),
                    param_type: "string".into(),
                    description: "2-letter ISO country code (e.g., 'FR')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "date".into(),
                    param_type: "string".into(),
                    description: "Date in YYYY-MM-DD format (e.g., '2026-07-14')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
            ],
            category: Some("travel".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let country = call
            .arguments
            .get("country_code")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(ToolResult::failure(
                "holiday_lookup",
                "country_code must be a 2-letter ISO code (e.g., 'FR', 'JP')",
            ));
        }

        let raw_date = call
            .arguments
            .get("date")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let date = match NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return Ok(ToolResult::failure(
                    "holiday_lookup",
                    "date must be in YYYY-MM-DD format (e.g., '2026-07-14')",
                ))
            }
        };

        let holidays = match self.source.holidays_on(&country, date).await {
            Ok(holidays) => holidays,
            Err(e) => return Ok(ToolResult::failure("holiday_lookup", e.to_string())),
        };

        let output = if holidays.is_empty() {
            format!("No public holidays in {} on {}.", country, date)
        } else {
            let mut lines = format!("Holidays in {} on {}:\n", country, date);
            for holiday in &holidays {
                match &holiday.kind {
                    Some(kind) => lines.push_str(&format!("  {} ({})\n", holiday.name, kind)),
                    None => lines.push_str(&format!("  {}\n", holiday.name)),
                }
            }
            lines.trim_end().to_string()
        };

        let data = serde_json::to_value(&holidays)?;
        Ok(ToolResult::success("holiday_lookup", output).with_data(data))
    }
}
