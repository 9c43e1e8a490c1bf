//! Application State

use std::sync::Arc;

use agent_core::{Assistant, LlmProvider, ToolRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session-holding assistant wrapping the reasoning loop
    pub assistant: Arc<Assistant>,

    /// LLM provider (Ollama, etc.), kept for health and model listing
    pub provider: Arc<dyn LlmProvider>,

    /// Tool registry the agent was built with
    pub tools: Arc<ToolRegistry>,

    /// Model every session runs against
    pub model: String,
}
