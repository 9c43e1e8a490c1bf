//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// The language model could not be reached or did not respond
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The language model responded but the response was unusable
    #[error("Model error: {0}")]
    Model(String),

    /// A tool with this name is already registered
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Tool not found in registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments failed schema validation
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Maximum iterations reached in reasoning loop
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// Session error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Convert to a user-facing message safe to show in the chat surface
    pub fn user_message(&self) -> String {
        match self {
            AgentError::ModelUnavailable(_) => {
                "The assistant is currently unavailable. Please try again in a moment.".into()
            }
            AgentError::Model(_) => "The assistant ran into a problem answering that.".into(),
            AgentError::DuplicateTool(name) => {
                format!("The tool '{}' is registered more than once.", name)
            }
            AgentError::UnknownTool(name) => format!("The tool '{}' is not available.", name),
            AgentError::InvalidArguments(msg) => format!("Invalid tool input: {}", msg),
            AgentError::ToolExecution(msg) => format!("Tool error: {}", msg),
            AgentError::MaxIterations(_) => {
                "I couldn't finish that within my reasoning budget. Please try a simpler or more specific question.".into()
            }
            AgentError::Session(msg) => format!("Session problem: {}", msg),
            AgentError::Config(_) => "The assistant is misconfigured. Please contact the operator.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Model(err.to_string())
    }
}
