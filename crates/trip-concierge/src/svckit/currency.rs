//! Currency Converter Tool
//!
//! Converts an amount between currencies at the live exchange rate.
//! All arithmetic runs on `Decimal`; the converted amount is rounded to
//! 2 decimal places.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::model::Conversion;
use crate::sources::RateSource;

/// Tool for converting currency amounts
pub struct CurrencyConverterTool {
    source: Arc<dyn RateSource>,
}

impl CurrencyConverterTool {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }
}

/// Normalize and check a 3-letter ISO 4217 code
fn parse_code(value: Option<&serde_json::Value>) -> Option<String> {
    let code = value?.as_str()?.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code)
    } else {
        None
    }
}

#[async_trait]
impl Tool for CurrencyConverterTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "convert_currency".into(),
            description: "Convert an amount from one currency to another at the current exchange rate.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "amount".into(),
                    param_type: "number".into(),
                    description: "Amount to convert, must be positive".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "from_currency".into(),
                    param_type: "string".into(),
                    description: "3-letter ISO source currency code (e.g., 'USD')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "to_currency".into(),
                    param_type: "string".into(),
                    description: "3-letter ISO target currency code (e.g., 'JPY')".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
            ],
            category: Some("travel".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let amount = call
            .arguments
            .get("amount")
            .and_then(|v| v.as_f64())
            .and_then(Decimal::from_f64_retain);
        let amount = match amount {
            Some(a) if a > Decimal::ZERO => a,
            _ => {
                return Ok(ToolResult::failure(
                    "convert_currency",
                    "amount must be a positive number",
                ))
            }
        };

        let (from, to) = match (
            parse_code(call.arguments.get("from_currency")),
            parse_code(call.arguments.get("to_currency")),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Ok(ToolResult::failure(
                    "convert_currency",
                    "currency codes must be 3-letter ISO codes (e.g., 'USD', 'EUR')",
                ))
            }
        };

        let (rate, as_of) = match self.source.pair_rate(&from, &to).await {
            Ok(quote) => quote,
            Err(e) => return Ok(ToolResult::failure("convert_currency", e.to_string())),
        };

        let conversion = Conversion::new(amount, from, to, rate, as_of);
        let output = format!(
            "{} {} = {} {} (rate {}, as of {})",
            conversion.amount,
            conversion.from,
            conversion.converted_amount,
            conversion.to,
            conversion.rate,
            conversion.as_of.format("%Y-%m-%d %H:%M UTC")
        );

        let data = serde_json::to_value(&conversion)?;
        Ok(ToolResult::success("convert_currency", output).with_data(data))
    }
}
