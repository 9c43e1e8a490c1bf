//! Service Kit - Agent Tools
//!
//! Travel-domain tools that implement `agent_core::Tool` for the concierge.

mod currency;
mod holiday;
mod search;
mod weather;

pub use currency::CurrencyConverterTool;
pub use holiday::HolidayLookupTool;
pub use search::WebSearchTool;
pub use weather::WeatherForecastTool;
