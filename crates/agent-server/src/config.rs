//! Server Configuration
//!
//! Every knob is an environment variable; `main` loads `.env` via dotenvy
//! before this module reads anything. Data-provider keys are optional:
//! a missing key disables that tool at registration time.

use std::time::Duration;

use agent_core::MemoryWindow;

/// Runtime configuration assembled from the environment
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address, `BIND_ADDR`
    pub bind_addr: String,

    /// Chat model requested from the provider, `MODEL_NAME`
    pub model: String,

    /// Reasoning-loop cap, `AGENT_MAX_ITERATIONS`
    pub max_iterations: usize,

    /// Context budget, `MEMORY_MAX_TURNS` / `MEMORY_MAX_TOKENS`
    pub window: MemoryWindow,

    /// Timeout for outbound data-provider requests, `PROVIDER_TIMEOUT_SECS`
    pub source_timeout: Duration,

    /// WeatherAPI.com key, `WEATHER_API_KEY`
    pub weather_api_key: Option<String>,

    /// ExchangeRate-API key, `EXCHANGE_RATE_API_KEY`
    pub exchange_rate_api_key: Option<String>,

    /// AbstractAPI holidays key, `HOLIDAY_API_KEY`
    pub holiday_api_key: Option<String>,
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to defaults
    /// for everything except the provider keys
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            model: env_or("MODEL_NAME", "llama3.2"),
            max_iterations: env_parsed("AGENT_MAX_ITERATIONS", 6),
            window: MemoryWindow {
                max_turns: env_parsed("MEMORY_MAX_TURNS", 40),
                max_tokens: env_parsed("MEMORY_MAX_TOKENS", 8192),
            },
            source_timeout: Duration::from_secs(env_parsed("PROVIDER_TIMEOUT_SECS", 10)),
            weather_api_key: env_opt("WEATHER_API_KEY"),
            exchange_rate_api_key: env_opt("EXCHANGE_RATE_API_KEY"),
            holiday_api_key: env_opt("HOLIDAY_API_KEY"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Set-but-blank counts as unset, so `WEATHER_API_KEY=` in a `.env`
/// template does not register a tool with an empty key.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
