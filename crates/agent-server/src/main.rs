//! trip-concierge HTTP Server
//!
//! Axum-based server exposing the travel assistant over a small REST API:
//! chat with per-session memory, transcript download, and capability
//! endpoints for tools and models.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::provider::GenerationOptions;
use agent_core::reasoning::{Agent, AgentConfig};
use agent_core::tool::{DateTimeTool, ToolRegistry};
use agent_core::{Assistant, LlmProvider};
use agent_runtime::OllamaProvider;

use trip_concierge::sources::{
    DuckDuckGoSource, ExchangeRateSource, HolidayApiSource, WeatherApiSource,
};
use trip_concierge::tools::{
    CurrencyConverterTool, HolidayLookupTool, WeatherForecastTool, WebSearchTool,
};
use trip_concierge::CONCIERGE_PROMPT;

use crate::config::ServerConfig;
use crate::handlers::{
    chat_handler, end_session, get_transcript, health_check, list_models, list_tools,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_env());

    // Verify Ollama connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - agent will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Initialize tools. Keyless tools always register; keyed data providers
    // register only when their API key is configured.
    let mut tools = ToolRegistry::new();

    tools.register(DateTimeTool)?;

    let search = DuckDuckGoSource::with_timeout(config.source_timeout)?;
    tools.register(WebSearchTool::new(Arc::new(search)))?;

    match config.weather_api_key.clone() {
        Some(key) => {
            let source = WeatherApiSource::with_timeout(key, config.source_timeout)?;
            tools.register(WeatherForecastTool::new(Arc::new(source)))?;
        }
        None => {
            tracing::warn!("⚠ WEATHER_API_KEY not set - weather_forecast disabled");
        }
    }

    match config.exchange_rate_api_key.clone() {
        Some(key) => {
            let source = ExchangeRateSource::with_timeout(key, config.source_timeout)?;
            tools.register(CurrencyConverterTool::new(Arc::new(source)))?;
        }
        None => {
            tracing::warn!("⚠ EXCHANGE_RATE_API_KEY not set - convert_currency disabled");
        }
    }

    match config.holiday_api_key.clone() {
        Some(key) => {
            let source = HolidayApiSource::with_timeout(key, config.source_timeout)?;
            tools.register(HolidayLookupTool::new(Arc::new(source)))?;
        }
        None => {
            tracing::warn!("⚠ HOLIDAY_API_KEY not set - holiday_lookup disabled");
        }
    }

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Build the agent and its session-holding facade
    let tools = Arc::new(tools);
    let agent_config = AgentConfig {
        system_prompt: CONCIERGE_PROMPT.into(),
        max_iterations: config.max_iterations,
        window: config.window,
        generation: GenerationOptions {
            model: config.model.clone(),
            ..GenerationOptions::default()
        },
        ..AgentConfig::default()
    };
    let agent = Agent::new(provider.clone(), tools.clone(), agent_config);
    let assistant = Arc::new(Assistant::new(agent));

    // Build application state
    let state = AppState {
        assistant,
        provider,
        tools,
        model: config.model.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & capability
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/tools", get(list_tools))
        // Assistant API
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions/{id}/transcript", get(get_transcript))
        .route("/api/sessions/{id}", delete(end_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 trip-concierge server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health                       - Health check");
    tracing::info!("  GET    /api/models                   - List available models");
    tracing::info!("  GET    /api/tools                    - List registered tools");
    tracing::info!("  POST   /api/chat                     - Send a message");
    tracing::info!("  GET    /api/sessions/{{id}}/transcript - Session transcript");
    tracing::info!("  DELETE /api/sessions/{{id}}            - End a session");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
