//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use agent_core::provider::ModelInfo;
use agent_core::tool::ToolSchema;
use agent_core::{AgentError, SessionId, Turn};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ollama_connected: bool,
    pub tools: Vec<String>,
    pub active_sessions: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    pub model: String,
    pub iterations: usize,
    /// True when the reply is a degraded answer after the reasoning cap
    pub exhausted: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolSchema>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Map an agent error to an HTTP response with UI-safe text
fn agent_error(err: &AgentError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match err {
        AgentError::ModelUnavailable(_) => (StatusCode::BAD_GATEWAY, "MODEL_UNAVAILABLE"),
        AgentError::Session(_) => (StatusCode::NOT_FOUND, "UNKNOWN_SESSION"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ollama_connected,
        tools: state.tools.names(),
        active_sessions: state.assistant.session_count(),
    })
}

/// Main chat endpoint.
///
/// Omitting `session_id` starts a fresh session; the response carries the
/// id to send with follow-up messages.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = payload
        .session_id
        .map(SessionId::from_string)
        .unwrap_or_default();

    let reply = state
        .assistant
        .submit(&session_id, &payload.message)
        .await
        .map_err(|e| {
            tracing::error!("Agent error: {}", e);
            agent_error(&e)
        })?;

    Ok(Json(ChatResponse {
        reply: reply.text,
        session_id: session_id.to_string(),
        model: state.model.clone(),
        iterations: reply.iterations,
        exhausted: reply.exhausted,
    }))
}

/// Session transcript, oldest turn first.
///
/// `?format=text` renders one `speaker: content` line per turn for
/// download; the default is the full JSON turn list, tool turns included.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let session_id = SessionId::from_string(id);

    if query.format.as_deref() == Some("text") {
        let text = state
            .assistant
            .transcript_text(&session_id)
            .await
            .map_err(|e| agent_error(&e))?;
        return Ok(text.into_response());
    }

    let turns = state
        .assistant
        .transcript(&session_id)
        .await
        .map_err(|e| agent_error(&e))?;

    Ok(Json(TranscriptResponse {
        session_id: session_id.to_string(),
        turns,
    })
    .into_response())
}

/// End a session and discard its transcript
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let session_id = SessionId::from_string(id);

    if state.assistant.end_session(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("unknown session {}", session_id),
                code: "UNKNOWN_SESSION".into(),
            }),
        ))
    }
}

/// List registered tools with their parameter schemas
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: state.tools.schemas(),
    })
}

/// List models available from the provider
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let models = state
        .provider
        .list_models()
        .await
        .map_err(|e| agent_error(&e))?;

    Ok(Json(ModelsResponse { models }))
}
