//! # trip-concierge
//!
//! Travel concierge toolset for a conversational agent: live weather,
//! currency conversion, public holidays, and web search.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  svckit (agent_core::Tool impls)                            │
//! │    weather_forecast │ convert_currency │ holiday_lookup │   │
//! │    web_search                                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  sources (trait seams)                                      │
//! │    WeatherSource │ RateSource │ HolidaySource │ SearchSource│
//! │      HTTP impls: WeatherAPI, ExchangeRate-API, AbstractAPI, │
//! │                  DuckDuckGo                                 │
//! │      Mock impls: deterministic tables for tests and demos   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tools validate their arguments and report provider failures as failed
//! tool results, so a broken upstream degrades one answer rather than the
//! whole conversation.

pub mod error;
pub mod model;
pub mod sources;
pub mod svckit;

pub use error::{ProviderError, Result};
pub use model::{Conversion, DayForecast, Forecast, Holiday, SearchHit};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        CurrencyConverterTool, HolidayLookupTool, WeatherForecastTool, WebSearchTool,
    };
}

/// System prompt for the trip concierge agent
pub const CONCIERGE_PROMPT: &str = r#"You are a precise, friendly travel concierge.

## Tool Routing

1. **Weather questions** - use `weather_forecast` (city, optional days 1-3)
2. **Currency conversion** - use `convert_currency` with 3-letter ISO codes; if the user names a country, map it to its currency code first
3. **Holiday questions** - use `holiday_lookup` with a 2-letter country code and a YYYY-MM-DD date
4. **Current events, news, facts you are unsure of** - use `web_search`
5. **Today's date or time** - use `datetime`

## Execution Rules

- Never fabricate or guess tool outputs. If a tool fails, say so honestly and answer with what you have.
- Use one tool at a time and wait for its result before deciding the next step.
- If you can answer accurately without tools, do so.

## Response Style

- Keep answers concise and structured; short paragraphs or bullet points.
- Quote amounts with their currencies and temperatures in Celsius.
- Do not output raw JSON or tool call syntax in your final answer."#;
